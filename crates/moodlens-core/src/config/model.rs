//! Configuration data structures

use super::logging_config::LoggingConfig;
use crate::error::{MoodlensError, MoodlensResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Facial-expression model queried by default
pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/trpakov/vit-face-expression";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> MoodlensResult<()> {
        self.inference.validate()
    }
}

/// Inference endpoint settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Endpoint images are POSTed to
    pub endpoint: String,
    /// Value sent in the `Authorization` header
    pub api_key: Option<String>,
    /// Attempts per image before giving up on a loading model
    pub max_attempts: u32,
    /// Wait used when the endpoint gives no `estimated_time` hint
    #[serde(with = "humantime_serde")]
    pub default_wait: Duration,
    /// Per-request HTTP timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_key: None,
            max_attempts: 5,
            default_wait: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("max_attempts", &self.max_attempts)
            .field("default_wait", &self.default_wait)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl InferenceConfig {
    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the attempt ceiling
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the fallback wait
    pub fn with_default_wait(mut self, default_wait: Duration) -> Self {
        self.default_wait = default_wait;
        self
    }

    /// Validate the inference settings
    pub fn validate(&self) -> MoodlensResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(MoodlensError::config("inference endpoint must not be empty"));
        }
        if self.max_attempts == 0 {
            return Err(MoodlensError::config_with_context(
                "max_attempts must be at least 1",
                "inference configuration",
            ));
        }
        Ok(())
    }
}

/// Document store backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    JsonDir,
}

impl FromStr for StorageBackend {
    type Err = MoodlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "json_dir" | "json-dir" | "json" => Ok(Self::JsonDir),
            other => Err(MoodlensError::config(format!(
                "unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the `json_dir` backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::JsonDir,
            path: PathBuf::from("data/sessions"),
        }
    }
}

impl StorageConfig {
    /// In-memory storage, nothing touches disk
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// JSON directory storage rooted at `path`
    pub fn json_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::JsonDir,
            path: path.into(),
        }
    }
}

/// Where uploaded media is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub images_dir: PathBuf,
    pub screenshots_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("uploads"),
            screenshots_dir: PathBuf::from("screenshots"),
        }
    }
}
