use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

/// Tag used for bare text nodes.
pub const TEXT_TAG: &str = "#text";

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Declarative description of a piece of markup.
///
/// Elements are cheap values built with chained setters and later mounted
/// into a [`Document`](crate::Document), which gives every node a stable
/// identity. This mirrors how a server-rendered page arrives: the whole tree
/// exists up front and behaviour only ever rearranges or annotates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Content
    pub content: Content,

    // Markup
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,

    // State
    pub hidden: bool,
    pub disabled: bool,
    /// Current value of a form control.
    pub value: String,
}

impl Default for Element {
    fn default() -> Self {
        Self::new("div")
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            id: generate_id(&tag),
            tag,
            content: Content::None,
            classes: Vec::new(),
            attrs: HashMap::new(),
            hidden: false,
            disabled: false,
            value: String::new(),
        }
    }

    /// A bare text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Content::Text(content.into()),
            ..Self::new(TEXT_TAG)
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn table() -> Self {
        Self::new("table")
    }

    pub fn thead() -> Self {
        Self::new("thead")
    }

    pub fn tbody() -> Self {
        Self::new("tbody")
    }

    pub fn tr() -> Self {
        Self::new("tr")
    }

    pub fn th(label: impl Into<String>) -> Self {
        Self::new("th").content(Content::Text(label.into()))
    }

    pub fn td(value: impl Into<String>) -> Self {
        Self::new("td").content(Content::Text(value.into()))
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new("button").content(Content::Text(label.into()))
    }

    pub fn form() -> Self {
        Self::new("form")
    }

    /// An `input` of the given `type`.
    pub fn input(kind: impl Into<String>) -> Self {
        Self::new("input").attr("type", kind)
    }

    pub fn img() -> Self {
        Self::new("img")
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Markup

    /// Add one or more space separated classes.
    pub fn class(mut self, names: &str) -> Self {
        for name in names.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&String> {
        self.attrs.get(name)
    }

    // Custom data (`data-*` attributes)
    pub fn data(self, key: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{key}"), value)
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.attrs.get(&format!("data-{key}"))
    }

    // State
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    // Children

    /// Append a child. Existing text content is kept as a leading text node.
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::None => self.content = Content::Children(vec![child]),
            Content::Text(text) => {
                let text = Element::text(std::mem::take(text));
                self.content = Content::Children(vec![text, child]);
            }
        }
        self
    }

    pub fn children(self, new_children: impl IntoIterator<Item = Element>) -> Self {
        new_children.into_iter().fold(self, |el, child| el.child(child))
    }
}
