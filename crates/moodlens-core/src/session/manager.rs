//! Session consistency manager
//!
//! Mediates every read and write of a session's image lists, result list
//! and metadata. The result list is only ever replaced wholesale, so it
//! always reflects the latest full analysis run.
//!
//! Concurrent writes to one session are last-writer-wins: each call is a
//! single atomic document update and nothing orders calls against each
//! other.

use super::naming::{child_name_regex, next_child_name};
use super::types::{
    AnalysisAvailability, DEFAULT_SESSION_NAME, MediaKind, Session, SessionSummary,
};
use crate::error::{MoodlensError, MoodlensResult};
use crate::inference::AnalysisResult;
use crate::storage::{DocumentPatch, Filter, Projection, SharedStore, UpdateOptions};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, instrument};

const SESSION: &str = "session";

/// Owns the consistency rules for session documents
#[derive(Clone)]
pub struct SessionManager {
    store: SharedStore,
}

impl SessionManager {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Append an uploaded reference, creating the session if needed.
    ///
    /// A given name always replaces the current one. Without a name a new
    /// session gets [`DEFAULT_SESSION_NAME`] and an existing one keeps its
    /// name. The timestamp is refreshed on every call.
    #[instrument(skip(self, session_name), fields(kind = %kind))]
    pub async fn record_upload(
        &self,
        session_id: &str,
        reference: &str,
        kind: MediaKind,
        session_name: Option<&str>,
    ) -> MoodlensResult<()> {
        let mut patch = DocumentPatch::new()
            .set("timestamp", Value::String(Utc::now().to_rfc3339()))
            .push(kind.field(), reference);

        patch = match session_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => patch.set("sessionName", name),
            None => patch.set_on_insert("sessionName", DEFAULT_SESSION_NAME),
        };

        self.store
            .find_one_and_update(session_id, &patch, UpdateOptions::upsert())
            .await?;

        debug!(session_id, reference, "upload recorded");
        Ok(())
    }

    /// Overwrite the session's results with `results`.
    ///
    /// Never merges with what was stored before. Fails with `NotFound`
    /// when the session does not exist.
    #[instrument(skip(self, results), fields(results = results.len()))]
    pub async fn replace_results(
        &self,
        session_id: &str,
        results: Vec<AnalysisResult>,
    ) -> MoodlensResult<Session> {
        let results = serde_json::to_value(results)?;
        let patch = DocumentPatch::new().set("modelResponse", results);

        let updated = self
            .store
            .find_one_and_update(session_id, &patch, UpdateOptions::existing())
            .await?
            .ok_or_else(|| MoodlensError::not_found(SESSION, session_id))?;

        Session::from_document(updated)
    }

    /// Evaluate whether every image of an existing session has a result
    pub async fn check_analysis_available(
        &self,
        session_id: &str,
    ) -> MoodlensResult<AnalysisAvailability> {
        let session = self.require(session_id, None).await?;

        if session.analysis_complete() {
            Ok(AnalysisAvailability::Available(session.model_response))
        } else {
            debug!(
                session_id,
                images = session.image_paths.len(),
                results = session.model_response.len(),
                "analysis incomplete"
            );
            Ok(AnalysisAvailability::Unavailable {
                images: session.image_paths.len(),
                results: session.model_response.len(),
            })
        }
    }

    /// Load a session, `None` when absent
    pub async fn find_session(&self, session_id: &str) -> MoodlensResult<Option<Session>> {
        self.store
            .find_one(session_id, None)
            .await?
            .map(Session::from_document)
            .transpose()
    }

    /// Load a session, `NotFound` when absent
    pub async fn get_session(&self, session_id: &str) -> MoodlensResult<Session> {
        self.require(session_id, None).await
    }

    /// Stored results, whether or not the analysis is complete
    pub async fn session_results(&self, session_id: &str) -> MoodlensResult<Vec<AnalysisResult>> {
        let projection = Projection::fields(["modelResponse"]);
        Ok(self.require(session_id, Some(&projection)).await?.model_response)
    }

    /// Stored image references
    pub async fn session_media(&self, session_id: &str) -> MoodlensResult<Vec<String>> {
        let projection = Projection::fields(["imagePaths"]);
        Ok(self.require(session_id, Some(&projection)).await?.image_paths)
    }

    /// Id, name and formatted timestamp of every session
    pub async fn list_sessions(&self) -> MoodlensResult<Vec<SessionSummary>> {
        let projection = Projection::fields(["sessionName", "timestamp"]);
        let documents = self.store.find(&Filter::All, Some(&projection)).await?;

        documents
            .into_iter()
            .map(|document| Session::from_document(document).map(|s| SessionSummary::from_session(&s)))
            .collect()
    }

    /// Next free `ChildNNN` session name
    pub async fn next_child_name(&self) -> MoodlensResult<String> {
        let filter = Filter::field_matches("sessionName", child_name_regex().clone());
        let projection = Projection::fields(["sessionName"]);
        let documents = self.store.find(&filter, Some(&projection)).await?;

        let names: Vec<&str> = documents
            .iter()
            .filter_map(|document| document.get("sessionName").and_then(Value::as_str))
            .collect();

        Ok(next_child_name(names))
    }

    async fn require(
        &self,
        session_id: &str,
        projection: Option<&Projection>,
    ) -> MoodlensResult<Session> {
        let document = self
            .store
            .find_one(session_id, projection)
            .await?
            .ok_or_else(|| MoodlensError::not_found(SESSION, session_id))?;
        Session::from_document(document)
    }
}
