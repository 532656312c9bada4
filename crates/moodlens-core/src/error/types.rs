//! Core error types for Moodlens

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for Moodlens operations
pub type MoodlensResult<T> = Result<T, MoodlensError>;

/// Why a caller-supplied input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    /// A required sequence was empty, missing, or not a sequence
    EmptyOrMissing,
    /// A value was present but malformed
    Malformed,
}

/// Classification of a failed call to the inference endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceErrorKind {
    /// The model is still loading. Retried inside the gateway.
    ModelLoading,
    /// The endpoint rejected the request shape. Never retried.
    BadRequest,
    /// Network failure, unexpected status or unexpected payload
    Transport,
    /// The attempt ceiling was reached while the model kept loading
    RetryExhausted,
}

impl fmt::Display for InferenceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoading => write!(f, "model loading"),
            Self::BadRequest => write!(f, "bad request"),
            Self::Transport => write!(f, "transport"),
            Self::RetryExhausted => write!(f, "retry exhausted"),
        }
    }
}

/// Classification of a failed local read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoErrorKind {
    NotFound,
    Other,
}

/// Main error type for Moodlens
#[derive(Error, Debug, Clone)]
pub enum MoodlensError {
    /// Bad caller input, never retried
    #[error("Validation error: {message}")]
    Validation {
        kind: ValidationKind,
        message: String,
    },

    /// Inference endpoint errors
    #[error("Inference error ({kind}): {message}")]
    Inference {
        kind: InferenceErrorKind,
        message: String,
        status_code: Option<u16>,
    },

    /// Document store unreachable or broken
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// Domain-level absence
    #[error("Not found: {resource_type} '{id}'")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Local IO errors (reading image bytes, upload files)
    #[error("IO error: {message}")]
    Io {
        kind: IoErrorKind,
        message: String,
        path: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },
}
