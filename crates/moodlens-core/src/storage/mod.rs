//! Keyed document storage
//!
//! A small document-store abstraction in the shape the session core needs:
//! point lookups by key, atomic per-document update with optional upsert,
//! and filtered scans. Two backends ship with the crate:
//! - `MemoryStore` for tests and throwaway runs
//! - `JsonDirStore` persisting one JSON file per document
//!
//! # Example
//! ```ignore
//! let store = storage::connect(&StorageConfig::in_memory()).await?;
//! let patch = DocumentPatch::new().push("imagePaths", json!("uploads/a.png"));
//! store.find_one_and_update("S1", &patch, UpdateOptions::upsert()).await?;
//! ```

pub mod backend;

pub use backend::{
    BackendType, Document, DocumentPatch, DocumentStore, Filter, JsonDirStore, MemoryStore,
    Projection, StoreError, UpdateOptions,
};

use crate::config::{StorageBackend, StorageConfig};
use std::sync::Arc;

/// Thread-safe shared document store
pub type SharedStore = Arc<dyn DocumentStore>;

/// Field every session document is keyed by
pub const SESSION_KEY_FIELD: &str = "sessionId";

/// Open the backend selected by the storage configuration
pub async fn connect(config: &StorageConfig) -> Result<SharedStore, StoreError> {
    let store: SharedStore = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new(SESSION_KEY_FIELD)),
        StorageBackend::JsonDir => {
            Arc::new(JsonDirStore::open(&config.path, SESSION_KEY_FIELD).await?)
        }
    };
    tracing::info!(backend = %store.backend_type(), "document store ready");
    Ok(store)
}
