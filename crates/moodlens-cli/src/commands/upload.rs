//! Upload command
//!
//! Stores the file under the configured directory as
//! `<unix-millis>-<original name>` and records that path on the session.

use crate::console;
use chrono::Utc;
use moodlens_core::config::UploadConfig;
use moodlens_core::{AnalysisService, MediaKind, MoodlensError, MoodlensResult};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Execute the upload command
pub async fn execute(
    service: &AnalysisService,
    uploads: &UploadConfig,
    session_id: &str,
    file: &Path,
    kind: MediaKind,
    session_name: Option<&str>,
) -> MoodlensResult<()> {
    let stored = store_file(uploads, kind, file).await?;
    let reference = stored.to_string_lossy().replace('\\', "/");

    service
        .record_upload(session_id, &reference, kind, session_name)
        .await?;

    console::success(&format!("{} uploaded to session {}", kind, session_id));
    console::print_json(&json!({
        "message": "File uploaded successfully",
        "filePath": reference,
    }));
    Ok(())
}

/// Copy `source` into the directory for `kind`
pub async fn store_file(uploads: &UploadConfig, kind: MediaKind, source: &Path) -> MoodlensResult<PathBuf> {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|_| source.is_file())
        .ok_or_else(|| MoodlensError::empty_or_missing("No file uploaded"))?;

    let dir = match kind {
        MediaKind::Image => &uploads.images_dir,
        MediaKind::Screenshot => &uploads.screenshots_dir,
    };
    tokio::fs::create_dir_all(dir).await?;

    let destination = dir.join(format!("{}-{}", Utc::now().timestamp_millis(), file_name));
    tokio::fs::copy(source, &destination).await?;

    tracing::debug!(source = %source.display(), destination = %destination.display(), "file stored");
    Ok(destination)
}
