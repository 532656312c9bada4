//! Retrying inference gateway

use super::transport::InferenceTransport;
use super::types::{AnalysisResult, ErrorBody, InferenceRequest, LOADING_MARKER, TransportResponse};
use crate::config::InferenceConfig;
use crate::error::{InferenceErrorKind, MoodlensError, MoodlensResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// What one attempt produced
#[derive(Debug)]
enum AttemptOutcome {
    Success(AnalysisResult),
    /// `wait` is the pause before the next attempt; zero unless `error` is retryable
    Failed { error: MoodlensError, wait: Duration },
}

impl AttemptOutcome {
    fn fatal(error: MoodlensError) -> Self {
        Self::Failed {
            error,
            wait: Duration::ZERO,
        }
    }
}

/// Stateless client for the facial-expression endpoint
#[derive(Clone)]
pub struct InferenceGateway {
    transport: Arc<dyn InferenceTransport>,
    max_attempts: u32,
    default_wait: Duration,
}

impl InferenceGateway {
    /// Create a gateway over `transport` with the retry policy from `config`
    pub fn new(transport: Arc<dyn InferenceTransport>, config: &InferenceConfig) -> Self {
        Self {
            transport,
            max_attempts: config.max_attempts.max(1),
            default_wait: config.default_wait,
        }
    }

    /// Attempt ceiling per image
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Classify one image.
    ///
    /// # Retry Strategy
    ///
    /// - 503 whose error mentions the model is loading: wait the
    ///   `estimated_time` hint (milliseconds, default from config), then retry
    /// - 400: fail with `BadRequest`, no retry
    /// - anything else that is not a 2xx JSON payload: fail with `Transport`
    /// - still loading after `max_attempts`: fail with `RetryExhausted`
    ///
    /// No wait follows the final attempt.
    #[instrument(skip(self, image_bytes), fields(bytes = image_bytes.len(), max_attempts = self.max_attempts))]
    pub async fn classify(&self, image_bytes: &[u8]) -> MoodlensResult<AnalysisResult> {
        let request = InferenceRequest::from_bytes(image_bytes);

        for attempt in 1..=self.max_attempts {
            let response = self.transport.post(&request).await?;

            match self.evaluate(response) {
                AttemptOutcome::Success(result) => {
                    if attempt > 1 {
                        info!(attempt, "inference succeeded after retry");
                    }
                    return Ok(result);
                }
                AttemptOutcome::Failed { error, .. } if !error.is_retryable() => {
                    warn!(attempt, error = %error, "non-retryable inference error");
                    return Err(error);
                }
                AttemptOutcome::Failed { error, wait } => {
                    if attempt == self.max_attempts {
                        break;
                    }
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "model is still loading, retrying"
                    );
                    sleep(wait).await;
                }
            }
        }

        tracing::error!(attempts = self.max_attempts, "all inference attempts exhausted");
        Err(MoodlensError::inference_with_status(
            InferenceErrorKind::RetryExhausted,
            format!(
                "Exceeded retry limit of {} attempts, unable to process the image",
                self.max_attempts
            ),
            STATUS_SERVICE_UNAVAILABLE,
        ))
    }

    fn evaluate(&self, response: TransportResponse) -> AttemptOutcome {
        if response.is_success() {
            return match serde_json::from_str(&response.body) {
                Ok(value) => AttemptOutcome::Success(AnalysisResult::new(value)),
                Err(e) => AttemptOutcome::fatal(MoodlensError::inference_with_status(
                    InferenceErrorKind::Transport,
                    format!("Unexpected inference payload: {}", e),
                    response.status,
                )),
            };
        }

        match response.status {
            STATUS_SERVICE_UNAVAILABLE => match loading_hint(&response.body) {
                Some(hint) => AttemptOutcome::Failed {
                    error: MoodlensError::inference_with_status(
                        InferenceErrorKind::ModelLoading,
                        "Model is currently loading",
                        response.status,
                    ),
                    wait: hint.unwrap_or(self.default_wait),
                },
                None => AttemptOutcome::fatal(MoodlensError::inference_with_status(
                    InferenceErrorKind::Transport,
                    format!("Inference service unavailable: {}", truncate(&response.body)),
                    response.status,
                )),
            },
            STATUS_BAD_REQUEST => AttemptOutcome::fatal(MoodlensError::inference_with_status(
                InferenceErrorKind::BadRequest,
                "Bad request: the image was not accepted in the format sent",
                response.status,
            )),
            status => AttemptOutcome::fatal(MoodlensError::inference_with_status(
                InferenceErrorKind::Transport,
                format!("Unexpected inference status {}: {}", status, truncate(&response.body)),
                status,
            )),
        }
    }
}

/// `Some(hint)` if the body says the model is loading; the inner value is
/// the suggested wait when one was given.
fn loading_hint(body: &str) -> Option<Option<Duration>> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if !parsed.error.as_ref()?.contains(LOADING_MARKER) {
        return None;
    }
    let wait = parsed
        .estimated_time
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| Duration::from_millis(ms.round() as u64));
    Some(wait)
}

fn truncate(body: &str) -> &str {
    const MAX: usize = 256;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_hint_with_estimate() {
        let hint = loading_hint(r#"{"error":"Model is currently loading","estimated_time":1234.4}"#);
        assert_eq!(hint, Some(Some(Duration::from_millis(1234))));
    }

    #[test]
    fn test_loading_hint_without_estimate() {
        let hint = loading_hint(r#"{"error":"Model is currently loading"}"#);
        assert_eq!(hint, Some(None));
    }

    #[test]
    fn test_loading_hint_rejects_other_errors() {
        assert_eq!(loading_hint(r#"{"error":"overloaded"}"#), None);
        assert_eq!(loading_hint("Service Unavailable"), None);
        assert_eq!(loading_hint(r#"{"estimated_time": 10}"#), None);
    }

    #[test]
    fn test_loading_hint_ignores_negative_estimate() {
        let hint = loading_hint(r#"{"error":"currently loading","estimated_time":-5}"#);
        assert_eq!(hint, Some(None));
    }

    #[test]
    fn test_loading_response_is_retryable_model_loading() {
        let transport: Arc<dyn InferenceTransport> = Arc::new(crate::testing::ScriptedTransport::new());
        let config = InferenceConfig::default().with_default_wait(Duration::from_millis(250));
        let gateway = InferenceGateway::new(transport, &config);

        let loading = TransportResponse::new(503, r#"{"error":"Model is currently loading"}"#);
        match gateway.evaluate(loading) {
            AttemptOutcome::Failed { error, wait } => {
                assert_eq!(error.inference_kind(), Some(InferenceErrorKind::ModelLoading));
                assert!(error.is_retryable());
                assert_eq!(wait, Duration::from_millis(250));
            }
            other => panic!("expected loading failure, got {:?}", other),
        }

        match gateway.evaluate(TransportResponse::new(400, "{}")) {
            AttemptOutcome::Failed { error, wait } => {
                assert!(!error.is_retryable());
                assert_eq!(wait, Duration::ZERO);
            }
            other => panic!("expected fatal failure, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(1000);
        assert_eq!(truncate(&body).len(), 256);
        assert_eq!(truncate("short"), "short");
    }
}
