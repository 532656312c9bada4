//! Error classification for callers that need to map errors to responses

use super::types::{InferenceErrorKind, MoodlensError};

/// Broad error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid caller input
    UserInput,
    /// Requested resource does not exist
    ResourceUnavailable,
    /// External inference service failure
    Dependency,
    /// Store, filesystem or configuration breakage
    Internal,
}

impl ErrorCategory {
    /// Get a user-friendly category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UserInput => "Invalid Input",
            Self::ResourceUnavailable => "Not Found",
            Self::Dependency => "Dependency Error",
            Self::Internal => "Internal Error",
        }
    }
}

impl MoodlensError {
    /// Category used when presenting the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::UserInput,
            Self::Inference {
                kind: InferenceErrorKind::BadRequest,
                ..
            } => ErrorCategory::UserInput,
            Self::Inference { .. } => ErrorCategory::Dependency,
            Self::NotFound { .. } => ErrorCategory::ResourceUnavailable,
            Self::Storage { .. } | Self::Io { .. } | Self::Config { .. } | Self::Json { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::UserInput => 400,
            ErrorCategory::ResourceUnavailable => 404,
            ErrorCategory::Dependency => 502,
            ErrorCategory::Internal => 500,
        }
    }

    /// Only a loading model is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Inference {
                kind: InferenceErrorKind::ModelLoading,
                ..
            }
        )
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Inference kind, if this is an inference error
    pub fn inference_kind(&self) -> Option<InferenceErrorKind> {
        match self {
            Self::Inference { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
