//! Configuration loading and management

use super::env_loader;
use super::file_loader;
use super::model::AppConfig;
use crate::error::MoodlensResult;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "moodlens.toml";

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a TOML file
    File(PathBuf),
    /// Overrides from environment variables (and `.env`)
    Environment,
    /// Default configuration
    Default,
}

/// Configuration loader with support for multiple sources
///
/// Later sources win. A file source replaces the whole configuration (its
/// missing fields take defaults); the environment only overrides the
/// variables it sets.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources
    pub fn load(self) -> MoodlensResult<AppConfig> {
        let mut config = AppConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config = file_loader::load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying config overrides from environment");
                    env_loader::apply_process_env(&mut config)?;
                }
                ConfigSource::Default => {
                    config = AppConfig::default();
                }
            }
        }

        config.validate()?;
        tracing::debug!(
            endpoint = %config.inference.endpoint,
            max_attempts = config.inference.max_attempts,
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Load configuration from defaults, an optional file, and the environment
pub fn load_config(config_file: Option<&Path>) -> MoodlensResult<AppConfig> {
    ConfigLoader::new()
        .with_defaults()
        .with_file(config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE)))
        .with_env()
        .load()
}
