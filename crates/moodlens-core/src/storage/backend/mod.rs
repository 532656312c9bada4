//! Document store backend implementations

mod json_dir;
mod memory;
#[allow(clippy::module_inception)]
mod r#trait;
mod types;

// Re-export all public APIs
pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use r#trait::DocumentStore;
pub use types::{
    BackendType, Document, DocumentPatch, Filter, Projection, StoreError, UpdateOptions,
};
