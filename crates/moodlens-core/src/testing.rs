//! In-process doubles for the gateway transport, image source and
//! persistence observer. Used by the test suites and for offline runs.

use crate::analysis::{ImageSource, PersistenceObserver};
use crate::error::{InferenceErrorKind, IoErrorKind, MoodlensError, MoodlensResult};
use crate::inference::{InferenceRequest, InferenceTransport, TransportResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};

/// Transport that replays a fixed script of responses.
///
/// Once the script runs out every call fails with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<MoodlensResult<TransportResponse>>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(TransportResponse::new(status, body)));
        self
    }

    /// Queue a 200 with `payload`
    pub fn success(self, payload: Value) -> Self {
        self.respond(200, payload.to_string())
    }

    /// Queue a 503 "model loading" response, with an optional wait hint in ms
    pub fn loading(self, estimated_time_ms: Option<f64>) -> Self {
        let body = match estimated_time_ms {
            Some(ms) => json!({"error": "Model is currently loading", "estimated_time": ms}),
            None => json!({"error": "Model is currently loading"}),
        };
        self.respond(503, body.to_string())
    }

    /// Queue a 400 response
    pub fn bad_request(self) -> Self {
        self.respond(400, json!({"error": "Invalid image"}).to_string())
    }

    /// Queue a network-level failure
    pub fn network_error(self, message: impl Into<String>) -> Self {
        self.script.lock().push_back(Err(MoodlensError::inference(
            InferenceErrorKind::Transport,
            message,
        )));
        self
    }

    /// Number of requests sent so far
    pub fn attempts(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests sent so far
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl InferenceTransport for ScriptedTransport {
    async fn post(&self, request: &InferenceRequest) -> MoodlensResult<TransportResponse> {
        self.requests.lock().push(request.clone());
        self.script.lock().pop_front().unwrap_or_else(|| {
            Err(MoodlensError::inference(
                InferenceErrorKind::Transport,
                "scripted transport has no more responses",
            ))
        })
    }
}

/// Image source backed by a map; unknown references are `NotFound`
#[derive(Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, reference: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.images.insert(reference.into(), bytes.into());
        self
    }
}

#[async_trait]
impl ImageSource for MemoryImageSource {
    async fn read(&self, reference: &str) -> MoodlensResult<Vec<u8>> {
        self.images.get(reference).cloned().ok_or_else(|| {
            MoodlensError::io_at(IoErrorKind::NotFound, "image not found", reference)
        })
    }
}

/// Observer that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingObserver {
    persisted: Mutex<Vec<(String, usize)>>,
    failed: Mutex<Vec<(String, MoodlensError)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persisted(&self) -> Vec<(String, usize)> {
        self.persisted.lock().clone()
    }

    pub fn failed(&self) -> Vec<(String, MoodlensError)> {
        self.failed.lock().clone()
    }
}

impl PersistenceObserver for RecordingObserver {
    fn on_persisted(&self, session_id: &str, result_count: usize) {
        self.persisted.lock().push((session_id.to_string(), result_count));
    }

    fn on_persist_failed(&self, session_id: &str, error: &MoodlensError) {
        self.failed.lock().push((session_id.to_string(), error.clone()));
    }
}
