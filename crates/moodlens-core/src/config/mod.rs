//! Configuration for Moodlens
//!
//! Resolved once at startup by [`ConfigLoader`] and handed by value to the
//! components that need it.

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod logging_config;
pub mod model;

pub use loader::{ConfigLoader, ConfigSource, DEFAULT_CONFIG_FILE, load_config};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{
    AppConfig, DEFAULT_INFERENCE_ENDPOINT, InferenceConfig, StorageBackend, StorageConfig,
    UploadConfig,
};
