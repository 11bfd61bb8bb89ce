//! Clipboard access
//!
//! Copy buttons write through a [`ClipboardProvider`] so the outcome is an
//! explicit `Result` the page can report either way.

use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::error::ClipboardError;

#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard via `arboard`.
///
/// Each write opens the clipboard on a blocking thread.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardProvider for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        let written = tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Rejected(e.to_string()))
        })
        .await;

        match written {
            Ok(result) => result,
            Err(e) => Err(ClipboardError::Unavailable(e.to_string())),
        }
    }
}

/// In-process clipboard for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    failing: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn failing() -> Self {
        Self {
            contents: Mutex::new(None),
            failing: true,
        }
    }

    /// Last text written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

#[async_trait]
impl ClipboardProvider for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.failing {
            return Err(ClipboardError::Rejected("clipboard is read-only".into()));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        debug!("Memory clipboard now holds {} bytes", text.len());
        *contents = Some(text.to_string());
        Ok(())
    }
}
