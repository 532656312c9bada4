//! Inference request/response types

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker the endpoint puts in its error message while the model warms up
pub const LOADING_MARKER: &str = "currently loading";

/// Opaque result returned by the model for one image.
///
/// Stored and returned verbatim; the core never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub Value);

impl AnalysisResult {
    /// Wrap a raw JSON payload
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the raw payload
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the raw payload
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Request body posted to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceRequest {
    /// Base64-encoded image bytes
    pub image: String,
}

impl InferenceRequest {
    /// Encode raw image bytes for transport
    pub fn from_bytes(image_bytes: &[u8]) -> Self {
        Self {
            image: BASE64_STANDARD.encode(image_bytes),
        }
    }
}

/// Raw HTTP response: status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error body returned by the endpoint
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorMessage>,
    /// Suggested wait in milliseconds
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

/// The `error` field is usually a string but some deployments send a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

impl ErrorMessage {
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text.contains(needle),
            Self::List(items) => items.iter().any(|item| item.contains(needle)),
        }
    }
}
