//! File-based configuration loading

use super::model::AppConfig;
use crate::error::{MoodlensError, MoodlensResult};
use std::fs;
use std::path::Path;

/// Load configuration from a TOML file
///
/// Returns the default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> MoodlensResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        MoodlensError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        MoodlensError::config_with_context(
            format!("Failed to parse TOML config: {}", e),
            format!("Deserializing TOML configuration from '{}'", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::StorageBackend;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("moodlens.toml");
        fs::write(
            &config_path,
            r#"
[inference]
max_attempts = 3
default_wait = "2s"

[storage]
backend = "memory"
"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.inference.max_attempts, 3);
        assert_eq!(config.inference.default_wait, Duration::from_secs(2));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        // untouched sections keep their defaults
        assert_eq!(config.uploads.images_dir.to_str(), Some("uploads"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_from_file(Path::new("/nonexistent/moodlens.toml")).unwrap();
        assert_eq!(config.inference.max_attempts, 5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[inference\nmax_attempts = ").unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, MoodlensError::Config { .. }));
    }
}
