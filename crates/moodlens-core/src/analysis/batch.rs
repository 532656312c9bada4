//! Sequential batch runner with detached persistence

use super::observer::PersistenceObserver;
use super::source::ImageSource;
use crate::error::{MoodlensError, MoodlensResult};
use crate::inference::{AnalysisResult, InferenceGateway};
use crate::session::SessionManager;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// One reference that produced no result
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub reference: String,
    pub error: MoodlensError,
}

/// How the detached write ended
#[derive(Debug, Clone)]
pub enum PersistenceOutcome {
    /// `modelResponse` was replaced with this many results
    Saved { result_count: usize },
    /// The store failed, or the session did not exist
    Failed(MoodlensError),
}

impl PersistenceOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Handle to the detached persistence task.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PersistenceHandle {
    handle: JoinHandle<PersistenceOutcome>,
}

impl PersistenceHandle {
    /// Wait for the write to finish
    pub async fn wait(self) -> PersistenceOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => PersistenceOutcome::Failed(MoodlensError::storage_with_context(
                format!("persistence task did not complete: {}", e),
                "detached persistence",
            )),
        }
    }
}

/// Result of one batch
#[derive(Debug)]
pub struct BatchRun {
    /// Results in completion order; shorter than the input when items failed
    pub results: Vec<AnalysisResult>,
    /// Items that were skipped, in input order
    pub failures: Vec<ItemFailure>,
    /// The write of `results` into the session
    pub persistence: PersistenceHandle,
}

/// Drives the gateway over a session's image references
#[derive(Clone)]
pub struct BatchRunner {
    gateway: InferenceGateway,
    source: Arc<dyn ImageSource>,
    sessions: SessionManager,
    observer: Arc<dyn PersistenceObserver>,
}

impl BatchRunner {
    pub fn new(
        gateway: InferenceGateway,
        source: Arc<dyn ImageSource>,
        sessions: SessionManager,
        observer: Arc<dyn PersistenceObserver>,
    ) -> Self {
        Self {
            gateway,
            source,
            sessions,
            observer,
        }
    }

    /// Analyze `image_refs` one at a time, skipping items that fail.
    ///
    /// Whatever succeeded (possibly nothing) replaces the session's stored
    /// results on a detached task; the results are returned without waiting
    /// for that write. Results are not positionally aligned with
    /// `image_refs`.
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(skip(self, image_refs), fields(images = image_refs.len()))]
    pub async fn run_batch(&self, session_id: &str, image_refs: &[String]) -> MoodlensResult<BatchRun> {
        if image_refs.is_empty() {
            return Err(MoodlensError::empty_or_missing("No images provided for analysis"));
        }

        let mut results = Vec::with_capacity(image_refs.len());
        let mut failures = Vec::new();

        for reference in image_refs {
            debug!(reference = %reference, "processing image");
            match self.process(reference).await {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(reference = %reference, error = %error, "failed to process image, skipping");
                    failures.push(ItemFailure {
                        reference: reference.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            session_id,
            succeeded = results.len(),
            failed = failures.len(),
            "batch analysis finished"
        );

        let persistence = self.persist_detached(session_id.to_string(), results.clone());

        Ok(BatchRun {
            results,
            failures,
            persistence,
        })
    }

    async fn process(&self, reference: &str) -> MoodlensResult<AnalysisResult> {
        let bytes = self.source.read(reference).await?;
        self.gateway.classify(&bytes).await
    }

    fn persist_detached(&self, session_id: String, results: Vec<AnalysisResult>) -> PersistenceHandle {
        let sessions = self.sessions.clone();
        let observer = Arc::clone(&self.observer);

        let handle = tokio::spawn(async move {
            let result_count = results.len();
            match sessions.replace_results(&session_id, results).await {
                Ok(_) => {
                    observer.on_persisted(&session_id, result_count);
                    PersistenceOutcome::Saved { result_count }
                }
                Err(error) => {
                    observer.on_persist_failed(&session_id, &error);
                    PersistenceOutcome::Failed(error)
                }
            }
        });

        PersistenceHandle { handle }
    }
}
