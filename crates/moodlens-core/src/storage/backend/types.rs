//! Document store type definitions

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Document store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Document store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendType {
    Memory,
    JsonDir,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "Memory"),
            Self::JsonDir => write!(f, "JsonDir"),
        }
    }
}

/// Field selection applied to returned documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Keep only the named fields
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply to a document. `key_field` always survives.
    pub fn apply(&self, document: &Document, key_field: &str) -> Document {
        document
            .iter()
            .filter(|(name, _)| name.as_str() == key_field || self.fields.iter().any(|f| f == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Document filter for scans
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Every document
    #[default]
    All,
    /// Documents whose string field matches a pattern
    FieldMatches { field: String, pattern: Regex },
}

impl Filter {
    /// Match a string field against a regular expression
    pub fn field_matches(field: impl Into<String>, pattern: Regex) -> Self {
        Self::FieldMatches {
            field: field.into(),
            pattern,
        }
    }

    /// Check a document against the filter
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::FieldMatches { field, pattern } => document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|value| pattern.is_match(value)),
        }
    }
}

/// Update applied atomically to one document
///
/// `set` assignments replace whole fields; `push` entries append to array
/// fields, creating the array when the field is absent. `set_on_insert`
/// assignments only apply when an upsert creates the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    set: Vec<(String, Value)>,
    set_on_insert: Vec<(String, Value)>,
    push: Vec<(String, Value)>,
}

impl DocumentPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a field wholesale
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    /// Assign a field only if this update creates the document
    pub fn set_on_insert(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_on_insert.push((field.into(), value.into()));
        self
    }

    /// Append a value to an array field
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push.push((field.into(), value.into()));
        self
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.set_on_insert.is_empty() && self.push.is_empty()
    }

    /// Apply the patch in place.
    ///
    /// Fails without touching the document if a push targets a non-array field.
    pub fn apply(&self, document: &mut Document) -> Result<(), StoreError> {
        for (field, _) in &self.push {
            if let Some(existing) = document.get(field) {
                if !existing.is_array() && !existing.is_null() {
                    return Err(StoreError::Internal(format!(
                        "cannot push to non-array field '{}'",
                        field
                    )));
                }
            }
        }

        for (field, value) in &self.set {
            document.insert(field.clone(), value.clone());
        }

        for (field, value) in &self.push {
            let slot = document
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                items.push(value.clone());
            }
        }

        Ok(())
    }
}

/// Options for `find_one_and_update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Create the document when it does not exist
    pub upsert: bool,
    /// Return the document after the update instead of before it
    pub return_updated: bool,
}

impl UpdateOptions {
    /// Upsert and return the updated document
    pub fn upsert() -> Self {
        Self {
            upsert: true,
            return_updated: true,
        }
    }

    /// Update an existing document only and return it updated
    pub fn existing() -> Self {
        Self {
            upsert: false,
            return_updated: true,
        }
    }
}

/// Shared find-and-update semantics over an optional current document.
///
/// Returns the document to store (if any) and the document to hand back.
pub(super) fn apply_update(
    current: Option<&Document>,
    key_field: &str,
    key: &str,
    patch: &DocumentPatch,
    options: UpdateOptions,
) -> Result<(Option<Document>, Option<Document>), StoreError> {
    match current {
        Some(existing) => {
            let mut updated = existing.clone();
            patch.apply(&mut updated)?;
            let returned = if options.return_updated {
                updated.clone()
            } else {
                existing.clone()
            };
            Ok((Some(updated), Some(returned)))
        }
        None if options.upsert => {
            let mut created = Document::new();
            created.insert(key_field.to_string(), Value::String(key.to_string()));
            for (field, value) in &patch.set_on_insert {
                created.insert(field.clone(), value.clone());
            }
            patch.apply(&mut created)?;
            let returned = options.return_updated.then(|| created.clone());
            Ok((Some(created), returned))
        }
        None => Ok((None, None)),
    }
}
