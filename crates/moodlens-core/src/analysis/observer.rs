//! Hook for the outcome of detached result persistence

use crate::error::MoodlensError;

/// Notified when a batch's results have (or have not) been persisted.
///
/// Persistence runs detached from the caller, so this is the only place a
/// lost write becomes visible besides the log.
pub trait PersistenceObserver: Send + Sync {
    /// Results were written for `session_id`
    fn on_persisted(&self, _session_id: &str, _result_count: usize) {}

    /// Results could not be written for `session_id`
    fn on_persist_failed(&self, session_id: &str, error: &MoodlensError);
}

/// Observer that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl PersistenceObserver for LoggingObserver {
    fn on_persisted(&self, session_id: &str, result_count: usize) {
        tracing::info!(session_id, result_count, "analysis results saved");
    }

    fn on_persist_failed(&self, session_id: &str, error: &MoodlensError) {
        tracing::error!(
            session_id,
            error = %error,
            status = error.status_code(),
            "failed to save analysis results"
        );
    }
}
