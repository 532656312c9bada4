//! Directory-backed JSON document store
//!
//! Each document lives in `<base>/doc-<encoded key>.json`. Keys whose
//! encoding would be too long for a file name are stored as
//! `<base>/doc.<sha256 of key>.json` instead; the key itself is always
//! read back from the document. Writes go to a temporary file first and are
//! renamed into place.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::r#trait::DocumentStore;
use super::types::{
    BackendType, Document, DocumentPatch, Filter, Projection, StoreError, UpdateOptions,
    apply_update,
};

/// File-based document store
#[derive(Debug)]
pub struct JsonDirStore {
    base_path: PathBuf,
    key_field: String,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonDirStore {
    /// Open (and create if needed) a store rooted at `base_path`
    pub async fn open(base_path: impl AsRef<Path>, key_field: impl Into<String>) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Connection(format!(
                "Failed to create store directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        tracing::info!("JSON document store opened at: {}", base_path.display());

        Ok(Self {
            base_path,
            key_field: key_field.into(),
            write_lock: Mutex::new(()),
        })
    }

    /// Get the store directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a document key
    fn document_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", document_stem(key)))
    }

    async fn read_document(path: &Path) -> Result<Option<Document>, StoreError> {
        match fs::read_to_string(path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_document(&self, key: &str, document: &Document) -> Result<(), StoreError> {
        let path = self.document_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(document)?;

        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!("Saved document {} to {:?}", key, path);
        Ok(())
    }

    fn project(&self, document: Document, projection: Option<&Projection>) -> Document {
        match projection {
            Some(projection) => projection.apply(&document, &self.key_field),
            None => document,
        }
    }
}

#[async_trait]
impl DocumentStore for JsonDirStore {
    fn backend_type(&self) -> BackendType {
        BackendType::JsonDir
    }

    async fn find_one(
        &self,
        key: &str,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>, StoreError> {
        let document = Self::read_document(&self.document_path(key)).await?;
        Ok(document.map(|document| self.project(document, projection)))
    }

    async fn find_one_and_update(
        &self,
        key: &str,
        patch: &DocumentPatch,
        options: UpdateOptions,
    ) -> Result<Option<Document>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let current = Self::read_document(&self.document_path(key)).await?;
        let (stored, returned) =
            apply_update(current.as_ref(), &self.key_field, key, patch, options)?;

        if let Some(document) = stored {
            self.write_document(key, &document).await?;
        }

        Ok(returned)
    }

    async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match Self::read_document(&path).await {
                Ok(Some(document)) if filter.matches(&document) => documents.push(document),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable document {:?}: {}", path, e),
            }
        }

        documents.sort_by(|a, b| {
            let key_a = a.get(&self.key_field).and_then(|v| v.as_str()).unwrap_or_default();
            let key_b = b.get(&self.key_field).and_then(|v| v.as_str()).unwrap_or_default();
            key_a.cmp(key_b)
        });

        Ok(documents
            .into_iter()
            .map(|document| self.project(document, projection))
            .collect())
    }
}

/// Longest stem that still leaves room for `.json.tmp` under the usual
/// 255-byte file name limit
const MAX_STEM_LEN: usize = 200;

/// File stem for a key. `.` never appears in an encoded key, so the two
/// forms cannot collide.
fn document_stem(key: &str) -> String {
    let encoded = encode_key(key);
    if encoded.len() + "doc-".len() <= MAX_STEM_LEN {
        format!("doc-{}", encoded)
    } else {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        format!("doc.{:x}", hasher.finalize())
    }
}

/// Percent-encode a caller-supplied key into file-name-safe characters
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
