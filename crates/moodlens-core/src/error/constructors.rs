//! Constructor methods for MoodlensError

use super::types::{InferenceErrorKind, IoErrorKind, MoodlensError, ValidationKind};

impl MoodlensError {
    /// Create a validation error for an empty or missing sequence
    pub fn empty_or_missing(message: impl Into<String>) -> Self {
        Self::Validation {
            kind: ValidationKind::EmptyOrMissing,
            message: message.into(),
        }
    }

    /// Create a validation error for a malformed value
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Validation {
            kind: ValidationKind::Malformed,
            message: message.into(),
        }
    }

    /// Create an inference error
    pub fn inference(kind: InferenceErrorKind, message: impl Into<String>) -> Self {
        Self::Inference {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// Create an inference error carrying the HTTP status that caused it
    pub fn inference_with_status(
        kind: InferenceErrorKind,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::Inference {
            kind,
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: None,
        }
    }

    /// Create a storage error with context
    pub fn storage_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            kind: IoErrorKind::Other,
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error for a path that could not be read
    pub fn io_at(kind: IoErrorKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            kind,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }
}
