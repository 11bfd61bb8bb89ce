//! Error types

use crate::document::NodeId;

/// Errors from parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected '{ch}' at position {pos} in selector")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Expected a name at position {pos} in selector")]
    ExpectedName { pos: usize },

    #[error("Unterminated attribute selector starting at position {pos}")]
    UnterminatedAttribute { pos: usize },

    #[error("Unterminated string starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("Dangling combinator at end of selector")]
    DanglingCombinator,
}

/// Errors from document queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0} does not exist (never created or already removed)")]
    UnknownNode(NodeId),

    #[error("The document root cannot be removed or moved")]
    RootNode,

    #[error("Cannot append {child} into {parent}: it would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    #[error("Text node {0} cannot have children")]
    TextParent(NodeId),

    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),
}
