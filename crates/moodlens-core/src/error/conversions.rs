//! From trait implementations for MoodlensError conversions

use super::types::{InferenceErrorKind, IoErrorKind, MoodlensError};
use crate::storage::StoreError;

impl From<std::io::Error> for MoodlensError {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::NotFound,
            _ => IoErrorKind::Other,
        };
        Self::Io {
            kind,
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for MoodlensError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for MoodlensError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "parsing TOML configuration")
    }
}

impl From<reqwest::Error> for MoodlensError {
    fn from(error: reqwest::Error) -> Self {
        Self::Inference {
            kind: InferenceErrorKind::Transport,
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
        }
    }
}

impl From<StoreError> for MoodlensError {
    fn from(error: StoreError) -> Self {
        let context = match &error {
            StoreError::Connection(_) => "store connection",
            StoreError::Serialization(_) => "document serialization",
            StoreError::Io(_) => "store io",
            StoreError::Internal(_) => "store internal",
        };
        Self::storage_with_context(error.to_string(), context)
    }
}
