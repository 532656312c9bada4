//! Document store trait definition
//!
//! Defines the common interface for all document store backends.

use async_trait::async_trait;

use super::types::{BackendType, Document, DocumentPatch, Filter, Projection, StoreError, UpdateOptions};

/// Keyed document store
///
/// Every operation on a single document is atomic. Nothing spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get backend type
    fn backend_type(&self) -> BackendType;

    /// Find the document stored under `key`
    async fn find_one(
        &self,
        key: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>, StoreError>;

    /// Apply `patch` to the document under `key`.
    ///
    /// Returns the updated document when `options.return_updated` is set,
    /// the pre-update document otherwise. `None` means no document existed
    /// before the call (and, without upsert, none was created).
    async fn find_one_and_update(
        &self,
        key: &str,
        patch: &DocumentPatch,
        options: UpdateOptions,
    ) -> Result<Option<Document>, StoreError>;

    /// Find all documents matching `filter`
    async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>, StoreError>;
}
