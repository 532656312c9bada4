//! Error types for Moodlens
//!
//! A single error enum covers the whole core. Callers can tell apart:
//! - bad caller input (`Validation`)
//! - failures talking to the inference endpoint (`Inference`)
//! - a broken or unreachable store (`Storage`)
//! - domain-level absence (`NotFound`)

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use classifiers::ErrorCategory;
pub use types::{
    InferenceErrorKind, IoErrorKind, MoodlensError, MoodlensResult, ValidationKind,
};
