//! Resolving image references to bytes

use crate::error::{IoErrorKind, MoodlensError, MoodlensResult};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the raw bytes behind an image reference
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn read(&self, reference: &str) -> MoodlensResult<Vec<u8>>;
}

/// Filesystem image source.
///
/// Absolute references are read as-is; relative ones are resolved against
/// `root` when set, otherwise against the working directory.
#[derive(Debug, Clone, Default)]
pub struct FsImageSource {
    root: Option<PathBuf>,
}

impl FsImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative references against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = PathBuf::from(reference);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl ImageSource for FsImageSource {
    async fn read(&self, reference: &str) -> MoodlensResult<Vec<u8>> {
        let path = self.resolve(reference);
        tokio::fs::read(&path).await.map_err(|e| {
            let kind = match e.kind() {
                std::io::ErrorKind::NotFound => IoErrorKind::NotFound,
                _ => IoErrorKind::Other,
            };
            MoodlensError::io_at(
                kind,
                format!("Failed to read image: {}", e),
                path.display().to_string(),
            )
        })
    }
}
