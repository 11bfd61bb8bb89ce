//! A small CSS selector subset.
//!
//! Supported: type (`tr`), universal (`*`), id (`#users`), class
//! (`.sortable`), attribute (`[data-target]`, `[type=date]`,
//! `[accept*=image]`, `^=`, `$=`, `~=`), compound selectors, the descendant
//! (` `) and child (`>`) combinators, and comma separated groups.

use std::str::FromStr;

use crate::document::{Document, Node, NodeId};
use crate::error::SelectorError;

/// A parsed selector, reusable across queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).selector()
    }

    /// Whether `node` matches any group of this selector.
    ///
    /// Ancestors are checked against the whole document, not just a query
    /// scope, the same way the browser matches `querySelectorAll`.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|group| group.matches(doc, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// A chain of compounds joined by combinators.
///
/// The combinator stored with `parts[i]` relates it to `parts[i - 1]`; the
/// first one is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.matches_at(doc, node, self.parts.len() - 1)
    }

    fn matches_at(&self, doc: &Document, node: NodeId, idx: usize) -> bool {
        let (combinator, compound) = &self.parts[idx];
        let Some(data) = doc.node(node) else {
            return false;
        };
        if !compound.matches(data) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match combinator {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.matches_at(doc, parent, idx - 1)),
            Combinator::Descendant => {
                let mut current = doc.parent(node);
                while let Some(ancestor) = current {
                    if self.matches_at(doc, ancestor, idx - 1) {
                        return true;
                    }
                    current = doc.parent(ancestor);
                }
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        if node.is_text() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !node.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id() != id {
                return false;
            }
        }
        self.classes.iter().all(|class| node.has_class(class))
            && self.attrs.iter().all(|attr| attr.matches(node))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
}

impl AttrMatcher {
    fn matches(&self, node: &Node) -> bool {
        let Some(actual) = node.attr(&self.name) else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => actual == v,
            AttrOp::Contains(v) => !v.is_empty() && actual.contains(v.as_str()),
            AttrOp::Prefix(v) => !v.is_empty() && actual.starts_with(v.as_str()),
            AttrOp::Suffix(v) => !v.is_empty() && actual.ends_with(v.as_str()),
            AttrOp::Word(v) => actual.split_whitespace().any(|w| w == v),
        }
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
            None => SelectorError::Empty,
        }
    }

    /// Returns true if any whitespace was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn selector(&mut self) -> Result<Selector, SelectorError> {
        let mut groups = Vec::new();
        loop {
            self.skip_ws();
            groups.push(self.complex()?);
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { groups })
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.compound()?;
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    if matches!(self.peek(), None | Some(',')) {
                        return Err(SelectorError::DanglingCombinator);
                    }
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => self.pos += 1,
            Some(ch) if is_name_char(ch) => compound.tag = Some(self.name()?.to_ascii_lowercase()),
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.name()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.name()?);
                }
                Some('[') => compound.attrs.push(self.attribute()?),
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if is_name_char(ch)) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SelectorError::ExpectedName { pos: start });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttrMatcher, SelectorError> {
        let start = self.pos;
        self.pos += 1;
        self.skip_ws();
        let name = self.name()?;
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatcher {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(ch @ ('*' | '^' | '$' | '~')) => {
                self.pos += 1;
                if self.peek() != Some('=') {
                    return Err(self.unexpected_in_attribute(start));
                }
                self.pos += 1;
                ch
            }
            Some(_) => return Err(self.unexpected()),
            None => return Err(SelectorError::UnterminatedAttribute { pos: start }),
        };

        self.skip_ws();
        let value = self.attribute_value(start)?;
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.unexpected_in_attribute(start));
        }
        self.pos += 1;

        let op = match op {
            '*' => AttrOp::Contains(value),
            '^' => AttrOp::Prefix(value),
            '$' => AttrOp::Suffix(value),
            '~' => AttrOp::Word(value),
            _ => AttrOp::Equals(value),
        };
        Ok(AttrMatcher { name, op })
    }

    fn attribute_value(&mut self, attr_start: usize) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos;
                self.pos += 1;
                let value_start = self.pos;
                while self.peek().is_some_and(|ch| ch != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(SelectorError::UnterminatedString { pos: start });
                }
                let value = self.chars[value_start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            None => Err(SelectorError::UnterminatedAttribute { pos: attr_start }),
            Some(_) => self.name(),
        }
    }

    fn unexpected_in_attribute(&self, attr_start: usize) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
            None => SelectorError::UnterminatedAttribute { pos: attr_start },
        }
    }
}
