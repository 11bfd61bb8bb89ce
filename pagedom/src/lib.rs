pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod selector;

pub use document::{Document, Node, NodeId};
pub use element::{find_element, Content, Element};
pub use error::{DomError, SelectorError};
pub use event::{Event, EventOutcome};
pub use selector::Selector;
