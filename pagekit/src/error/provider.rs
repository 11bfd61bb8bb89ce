//! Errors from asynchronous providers

/// Clipboard write failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display).
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the write.
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// File read failures for previews.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
