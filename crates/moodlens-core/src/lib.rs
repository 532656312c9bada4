//! Moodlens Core Library
//!
//! Session-oriented facial-expression analysis: a retrying gateway to the
//! inference endpoint, a batch runner that tolerates per-image failures,
//! and a session manager that keeps each session's image list and result
//! list consistent in a keyed document store.

pub mod analysis;
pub mod config;
pub mod error;
pub mod inference;
pub mod service;
pub mod session;
pub mod storage;
pub mod testing;

// Re-export commonly used types
pub use analysis::{BatchRun, BatchRunner, PersistenceHandle, PersistenceOutcome};
pub use config::{AppConfig, ConfigLoader, load_config};
pub use error::{MoodlensError, MoodlensResult};
pub use inference::{AnalysisResult, InferenceGateway};
pub use service::{AnalysisService, AnalyzeOutcome, AnalyzeResponse};
pub use session::{AnalysisAvailability, MediaKind, Session, SessionManager, SessionSummary};
pub use storage::{DocumentStore, SharedStore};
