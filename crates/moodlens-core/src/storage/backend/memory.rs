//! In-memory document store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::r#trait::DocumentStore;
use super::types::{
    BackendType, Document, DocumentPatch, Filter, Projection, StoreError, UpdateOptions,
    apply_update,
};

#[derive(Debug, Default)]
struct Collection {
    documents: HashMap<String, Document>,
    // insertion order, so scans come back in creation order
    order: Vec<String>,
}

/// In-memory document store (for testing or temporary runs)
#[derive(Debug)]
pub struct MemoryStore {
    key_field: String,
    collection: Arc<RwLock<Collection>>,
    connected: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store whose documents are keyed by `key_field`
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            collection: Arc::new(RwLock::new(Collection::default())),
            connected: AtomicBool::new(true),
        }
    }

    /// Simulate losing the connection; every later call fails
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Restore a simulated connection
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.collection.read().await.documents.len()
    }

    /// Check if the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Connection("Not connected".to_string()))
        }
    }

    fn project(&self, document: &Document, projection: Option<&Projection>) -> Document {
        match projection {
            Some(projection) => projection.apply(document, &self.key_field),
            None => document.clone(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }

    async fn find_one(
        &self,
        key: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_connected()?;
        let collection = self.collection.read().await;
        Ok(collection
            .documents
            .get(key)
            .map(|document| self.project(document, projection)))
    }

    async fn find_one_and_update(
        &self,
        key: &str,
        patch: &DocumentPatch,
        options: UpdateOptions,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_connected()?;
        let mut collection = self.collection.write().await;

        let (stored, returned) =
            apply_update(collection.documents.get(key), &self.key_field, key, patch, options)?;

        if let Some(document) = stored {
            if collection.documents.insert(key.to_string(), document).is_none() {
                collection.order.push(key.to_string());
            }
        }

        Ok(returned)
    }

    async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_connected()?;
        let collection = self.collection.read().await;
        Ok(collection
            .order
            .iter()
            .filter_map(|key| collection.documents.get(key))
            .filter(|document| filter.matches(document))
            .map(|document| self.project(document, projection))
            .collect())
    }
}
