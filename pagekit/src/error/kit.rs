use pagedom::{DomError, SelectorError};

use super::{ClipboardError, FileError};

/// Errors surfaced by page behaviour.
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    /// No element on the page can hold a notification.
    #[error("No notification container matches '{selector}'")]
    MissingContainer { selector: String },

    /// A configured marker is not a valid selector.
    #[error("Invalid marker selector '{selector}': {source}")]
    InvalidMarker {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
