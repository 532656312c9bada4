//! Caller-facing analysis service
//!
//! Wires configuration, store, gateway, image source and observer into the
//! operations a front end (the CLI, an HTTP layer) exposes.

use crate::analysis::{
    BatchRunner, FsImageSource, ImageSource, ItemFailure, LoggingObserver, PersistenceHandle,
    PersistenceObserver,
};
use crate::config::AppConfig;
use crate::error::{MoodlensError, MoodlensResult};
use crate::inference::{AnalysisResult, HttpTransport, InferenceGateway};
use crate::session::{AnalysisAvailability, MediaKind, Session, SessionManager, SessionSummary};
use crate::storage::{self, SharedStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Body returned by `analyze` and `check_analysis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis_results: Vec<AnalysisResult>,
}

/// Everything an analyze call produced
#[derive(Debug)]
pub struct AnalyzeOutcome {
    /// What the caller gets back, partial or empty included
    pub response: AnalyzeResponse,
    /// Items skipped by the batch
    pub failures: Vec<ItemFailure>,
    /// Pending write of the results; drop it to fire and forget
    pub persistence: PersistenceHandle,
}

/// Session analysis operations over one store and one inference endpoint
#[derive(Clone)]
pub struct AnalysisService {
    sessions: SessionManager,
    runner: BatchRunner,
}

impl AnalysisService {
    /// Assemble a service from explicit parts
    pub fn new(
        store: SharedStore,
        gateway: InferenceGateway,
        source: Arc<dyn ImageSource>,
        observer: Arc<dyn PersistenceObserver>,
    ) -> Self {
        let sessions = SessionManager::new(store);
        let runner = BatchRunner::new(gateway, source, sessions.clone(), observer);
        Self { sessions, runner }
    }

    /// Connect the configured store and HTTP endpoint
    pub async fn from_config(config: &AppConfig) -> MoodlensResult<Self> {
        config.validate()?;
        let store = storage::connect(&config.storage).await?;
        let transport = Arc::new(HttpTransport::new(&config.inference)?);
        let gateway = InferenceGateway::new(transport, &config.inference);

        info!(
            endpoint = %config.inference.endpoint,
            max_attempts = gateway.max_attempts(),
            "analysis service ready"
        );

        Ok(Self::new(
            store,
            gateway,
            Arc::new(FsImageSource::new()),
            Arc::new(LoggingObserver),
        ))
    }

    /// Direct access to the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Analyze the references in a JSON `images` value.
    ///
    /// `images` must be a non-empty array of strings.
    pub async fn analyze(&self, session_id: &str, images: &Value) -> MoodlensResult<AnalyzeOutcome> {
        let image_refs = parse_image_refs(images)?;
        self.analyze_refs(session_id, &image_refs).await
    }

    /// Analyze already-parsed references
    #[instrument(skip(self, image_refs))]
    pub async fn analyze_refs(
        &self,
        session_id: &str,
        image_refs: &[String],
    ) -> MoodlensResult<AnalyzeOutcome> {
        let run = self.runner.run_batch(session_id, image_refs).await?;
        Ok(AnalyzeOutcome {
            response: AnalyzeResponse {
                analysis_results: run.results,
            },
            failures: run.failures,
            persistence: run.persistence,
        })
    }

    /// Stored results when every image has one.
    ///
    /// An incomplete analysis is reported as `NotFound`, same as a missing
    /// session.
    pub async fn check_analysis(&self, session_id: &str) -> MoodlensResult<AnalyzeResponse> {
        match self.sessions.check_analysis_available(session_id).await? {
            AnalysisAvailability::Available(analysis_results) => {
                Ok(AnalyzeResponse { analysis_results })
            }
            AnalysisAvailability::Unavailable { .. } => {
                Err(MoodlensError::not_found("analysis", session_id))
            }
        }
    }

    pub async fn record_upload(
        &self,
        session_id: &str,
        reference: &str,
        kind: MediaKind,
        session_name: Option<&str>,
    ) -> MoodlensResult<()> {
        self.sessions
            .record_upload(session_id, reference, kind, session_name)
            .await
    }

    pub async fn list_sessions(&self) -> MoodlensResult<Vec<SessionSummary>> {
        self.sessions.list_sessions().await
    }

    pub async fn next_child_name(&self) -> MoodlensResult<String> {
        self.sessions.next_child_name().await
    }

    pub async fn session_results(&self, session_id: &str) -> MoodlensResult<Vec<AnalysisResult>> {
        self.sessions.session_results(session_id).await
    }

    pub async fn session_media(&self, session_id: &str) -> MoodlensResult<Vec<String>> {
        self.sessions.session_media(session_id).await
    }

    pub async fn session_detail(&self, session_id: &str) -> MoodlensResult<Session> {
        self.sessions.get_session(session_id).await
    }
}

/// Parse the `images` field of an analyze request
pub fn parse_image_refs(images: &Value) -> MoodlensResult<Vec<String>> {
    let items = match images {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(MoodlensError::empty_or_missing(
                "No images provided for analysis",
            ));
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(reference) => Ok(reference.clone()),
            other => Err(MoodlensError::malformed(format!(
                "image reference must be a string, got {}",
                other
            ))),
        })
        .collect()
}
