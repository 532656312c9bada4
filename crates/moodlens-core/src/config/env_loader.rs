//! Environment variable-based configuration overrides

use super::model::{AppConfig, StorageBackend};
use crate::error::{MoodlensError, MoodlensResult};
use std::path::PathBuf;
use std::time::Duration;

/// Apply overrides from the process environment.
///
/// Loads a `.env` file first if one is present.
pub fn apply_process_env(config: &mut AppConfig) -> MoodlensResult<()> {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    apply_env(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `lookup`
///
/// Recognised variables:
/// - `MOODLENS_INFERENCE_ENDPOINT`
/// - `MOODLENS_API_KEY`, falling back to `HUGGING_FACE_API_KEY`
/// - `MOODLENS_MAX_ATTEMPTS`
/// - `MOODLENS_DEFAULT_WAIT_MS`
/// - `MOODLENS_STORAGE_BACKEND` / `MOODLENS_STORAGE_PATH`
/// - `MOODLENS_UPLOADS_DIR` / `MOODLENS_SCREENSHOTS_DIR`
/// - `MOODLENS_LOG_LEVEL` / `MOODLENS_LOG_FORMAT`
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> MoodlensResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup("MOODLENS_INFERENCE_ENDPOINT") {
        config.inference.endpoint = endpoint;
    }

    if let Some(api_key) = lookup("MOODLENS_API_KEY").or_else(|| lookup("HUGGING_FACE_API_KEY")) {
        config.inference.api_key = Some(api_key);
    }

    if let Some(value) = lookup("MOODLENS_MAX_ATTEMPTS") {
        config.inference.max_attempts = value.parse().map_err(|_| {
            MoodlensError::config_with_context(
                "Invalid MOODLENS_MAX_ATTEMPTS value",
                format!("Parsing max attempts value '{}'", value),
            )
        })?;
    }

    if let Some(value) = lookup("MOODLENS_DEFAULT_WAIT_MS") {
        let millis: u64 = value.parse().map_err(|_| {
            MoodlensError::config_with_context(
                "Invalid MOODLENS_DEFAULT_WAIT_MS value",
                format!("Parsing wait value '{}'", value),
            )
        })?;
        config.inference.default_wait = Duration::from_millis(millis);
    }

    if let Some(value) = lookup("MOODLENS_STORAGE_BACKEND") {
        config.storage.backend = value.parse::<StorageBackend>()?;
    }

    if let Some(path) = lookup("MOODLENS_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    }

    if let Some(dir) = lookup("MOODLENS_UPLOADS_DIR") {
        config.uploads.images_dir = PathBuf::from(dir);
    }

    if let Some(dir) = lookup("MOODLENS_SCREENSHOTS_DIR") {
        config.uploads.screenshots_dir = PathBuf::from(dir);
    }

    if let Some(level) = lookup("MOODLENS_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("MOODLENS_LOG_FORMAT") {
        config.logging.format = format.parse().map_err(MoodlensError::config)?;
    }

    Ok(())
}
