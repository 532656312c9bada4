//! Outbound transport for inference requests

use super::types::{InferenceRequest, TransportResponse};
use crate::config::InferenceConfig;
use crate::error::{InferenceErrorKind, MoodlensError, MoodlensResult};
use async_trait::async_trait;
use reqwest::Client;

/// Sends one request to the inference endpoint.
///
/// Implementations report any HTTP status as a `TransportResponse`; only a
/// failure to get a response at all is an error.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn post(&self, request: &InferenceRequest) -> MoodlensResult<TransportResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    authorization: Option<String>,
}

impl HttpTransport {
    /// Build a transport from resolved configuration
    pub fn new(config: &InferenceConfig) -> MoodlensResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                MoodlensError::config_with_context(
                    format!("Failed to build HTTP client: {}", e),
                    "inference transport",
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            authorization: config.api_key.as_deref().map(authorization_value),
        })
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn post(&self, request: &InferenceRequest) -> MoodlensResult<TransportResponse> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(authorization) = &self.authorization {
            builder = builder.header("Authorization", authorization);
        }

        let response = builder.send().await.map_err(|e| {
            MoodlensError::inference(
                InferenceErrorKind::Transport,
                format!("Inference request failed: {}", e),
            )
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            MoodlensError::inference_with_status(
                InferenceErrorKind::Transport,
                format!("Failed to read inference response body: {}", e),
                status,
            )
        })?;

        Ok(TransportResponse { status, body })
    }
}

/// Accept either a bare token or a full `Bearer ...` header value
fn authorization_value(api_key: &str) -> String {
    let trimmed = api_key.trim();
    if trimmed.to_ascii_lowercase().starts_with("bearer ") {
        trimmed.to_string()
    } else {
        format!("Bearer {}", trimmed)
    }
}
