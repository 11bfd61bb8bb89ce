//! File reads for image previews

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose;
use dashmap::DashMap;

use crate::error::FileError;

#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read(&self, path: &str) -> Result<Vec<u8>, FileError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Default)]
pub struct FsSource;

impl FsSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSource for FsSource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, FileError> {
        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FileError::NotFound(path.to_string())
            } else {
                FileError::Read {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// Files held in memory, keyed by path.
///
/// # Example
///
/// ```
/// use pagekit::files::MemorySource;
///
/// let files = MemorySource::new();
/// files.insert("avatar.png", vec![0x89, b'P', b'N', b'G']);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    files: DashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl FileSource for MemorySource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, FileError> {
        self.files
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FileError::NotFound(path.to_string()))
    }
}

/// Mime type guessed from the file extension.
pub fn mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// `data:` URL embedding `bytes`, typed by `path`'s extension.
pub fn data_url(path: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type(path),
        general_purpose::STANDARD.encode(bytes)
    )
}
