//! Tracing subscriber setup

use moodlens_core::config::{AppConfig, LogFormat, LoggingConfig};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level; `--verbose` raises the
/// configured level to debug. Logs go to stderr so stdout stays JSON.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Log the resolved configuration.
///
/// Loading happens before the subscriber exists, so this is the first
/// point where the result can be recorded.
pub fn report_config(config_file: Option<&Path>, config: &AppConfig) {
    tracing::debug!(
        config_file = ?config_file,
        inference = ?config.inference,
        storage = ?config.storage,
        uploads = ?config.uploads,
        "configuration resolved"
    );
}
