//! Mounted document tree with stable node identity.
//!
//! Nodes live in an arena of generational slots. A [`NodeId`] stays valid
//! while its node is in the document, including while it is moved around by
//! [`Document::append_child`]. Once [`Document::remove`] frees a subtree every
//! handle into it goes stale, so a second removal through an old handle is
//! reported instead of touching an unrelated node.

use std::collections::HashMap;

use log::trace;

use crate::element::{Content, Element, TEXT_TAG};
use crate::error::DomError;
use crate::selector::Selector;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// One node of the document: an element or a text node.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    tag: String,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    text: Option<String>,
    hidden: bool,
    disabled: bool,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Own text of a text node. Elements return `None`.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    // Classes
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn add_class(&mut self, name: &str) {
        if !self.has_class(name) {
            self.classes.push(name.to_string());
        }
    }

    pub fn remove_class(&mut self, name: &str) {
        self.classes.retain(|c| c != name);
    }

    // Attributes
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Read a `data-*` attribute by its short key.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attr(&format!("data-{key}"))
    }

    // State
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An owned, mutable tree of nodes rooted at a single element.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Document {
    /// Mount `root` and everything below it.
    pub fn new(root: Element) -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        doc.root = doc.mount(root, None);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(DomError::UnknownNode(id))
    }

    fn get(&self, id: NodeId) -> Result<&Node, DomError> {
        self.node(id).ok_or(DomError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Mount an element as a detached subtree. Attach it with
    /// [`append_child`](Self::append_child) or [`insert_first`](Self::insert_first).
    pub fn create(&mut self, element: Element) -> NodeId {
        self.mount(element, None)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn mount(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let Element {
            id,
            tag,
            content,
            classes,
            attrs,
            hidden,
            disabled,
            value,
        } = element;

        let is_text = tag == TEXT_TAG;
        let text = match (&content, is_text) {
            (Content::Text(s), true) => Some(s.clone()),
            _ => None,
        };

        let node_id = self.alloc(Node {
            id,
            tag,
            classes,
            attrs,
            text,
            hidden,
            disabled,
            value,
            parent,
            children: Vec::new(),
        });

        if is_text {
            return node_id;
        }

        let children: Vec<NodeId> = match content {
            Content::None => Vec::new(),
            Content::Text(s) => vec![self.mount(Element::text(s), Some(node_id))],
            Content::Children(children) => children
                .into_iter()
                .map(|child| self.mount(child, Some(node_id)))
                .collect(),
        };
        if let Some(slot) = self.slots[node_id.index as usize].node.as_mut() {
            slot.children = children;
        }
        node_id
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// All children, text nodes included.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only, like the browser's `children` collection.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.node(*c).is_some_and(|n| !n.is_text()))
            .collect()
    }

    /// Position of an element among its parent's element children.
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.element_children(parent).iter().position(|c| *c == id)
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.root
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Every node below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(node) if node.is_text() => node.text.clone().unwrap_or_default(),
            Some(_) => self
                .descendants(id)
                .into_iter()
                .filter_map(|d| self.node(d).and_then(|n| n.text.as_deref()))
                .collect(),
            None => String::new(),
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        if self.get(id)?.is_text() {
            self.node_mut(id)?.text = Some(text.into());
            return Ok(());
        }
        for child in self.children(id).to_vec() {
            self.remove(child)?;
        }
        let text_node = self.create(Element::text(text));
        self.append_child(id, text_node)
    }

    /// Find an attached element by its `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|n| self.node(*n).is_some_and(|node| !node.is_text() && node.id == id))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// Nearest ancestor-or-self matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if selector.matches(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// First descendant of `scope` matching `selector`.
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    /// All descendants of `scope` matching `selector`, in document order.
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    /// Parse `selector` and return the first match below `scope`.
    pub fn query(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(scope, &selector))
    }

    /// Parse `selector` and return every match below `scope`.
    pub fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(scope, &selector))
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved, never duplicated.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `child` as the first child of `parent`, moving it if attached.
    pub fn insert_first(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.insert(0, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent)?.is_text() {
            return Err(DomError::TextParent(parent));
        }
        self.get(child)?;
        if child == self.root {
            return Err(DomError::RootNode);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::WouldCycle { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        if let Some(old_parent) = self.get(id)?.parent {
            self.node_mut(old_parent)?.children.retain(|c| *c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Detach `id` and free its whole subtree.
    ///
    /// Fails with [`DomError::UnknownNode`] if the node was already removed.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.root {
            return Err(DomError::RootNode);
        }
        self.detach(id)?;

        let mut freed = 0usize;
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let slot = &mut self.slots[node_id.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node_id.index);
                stack.extend(node.children);
                freed += 1;
            }
        }
        trace!("Removed {} ({} nodes freed)", id, freed);
        Ok(())
    }
}
