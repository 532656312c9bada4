//! Tests for the session consistency manager

use super::*;
use crate::error::MoodlensError;
use crate::inference::AnalysisResult;
use crate::storage::{MemoryStore, SESSION_KEY_FIELD, SharedStore};
use serde_json::json;
use std::sync::Arc;

fn manager() -> (SessionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(SESSION_KEY_FIELD));
    let shared: SharedStore = store.clone();
    (SessionManager::new(shared), store)
}

fn results(labels: &[&str]) -> Vec<AnalysisResult> {
    labels
        .iter()
        .map(|label| AnalysisResult::new(json!([{"label": label, "score": 0.9}])))
        .collect()
}

#[tokio::test]
async fn test_record_upload_creates_session_with_default_name() {
    let (sessions, _) = manager();

    sessions
        .record_upload("S1", "uploads/a.png", MediaKind::Image, None)
        .await
        .unwrap();

    let session = sessions.get_session("S1").await.unwrap();
    assert_eq!(session.session_id, "S1");
    assert_eq!(session.session_name, DEFAULT_SESSION_NAME);
    assert_eq!(session.image_paths, vec!["uploads/a.png"]);
    assert!(session.model_response.is_empty());
    assert!(session.timestamp.is_some());
}

#[tokio::test]
async fn test_record_upload_appends_in_call_order() {
    let (sessions, _) = manager();

    for reference in ["a.png", "b.png", "c.png"] {
        sessions
            .record_upload("S1", reference, MediaKind::Image, None)
            .await
            .unwrap();
    }

    let session = sessions.get_session("S1").await.unwrap();
    assert_eq!(session.image_paths, vec!["a.png", "b.png", "c.png"]);
}

#[tokio::test]
async fn test_record_upload_name_handling() {
    let (sessions, _) = manager();

    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    sessions
        .record_upload("S1", "b.png", MediaKind::Image, Some("Alpha"))
        .await
        .unwrap();
    assert_eq!(sessions.get_session("S1").await.unwrap().session_name, "Alpha");

    // no name keeps the current one
    sessions.record_upload("S1", "c.png", MediaKind::Image, None).await.unwrap();
    assert_eq!(sessions.get_session("S1").await.unwrap().session_name, "Alpha");

    // blank counts as no name
    sessions
        .record_upload("S1", "d.png", MediaKind::Image, Some("   "))
        .await
        .unwrap();
    assert_eq!(sessions.get_session("S1").await.unwrap().session_name, "Alpha");

    sessions
        .record_upload("S1", "e.png", MediaKind::Image, Some("Beta"))
        .await
        .unwrap();
    assert_eq!(sessions.get_session("S1").await.unwrap().session_name, "Beta");
}

#[tokio::test]
async fn test_record_upload_refreshes_timestamp() {
    let (sessions, _) = manager();

    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    let first = sessions.get_session("S1").await.unwrap().timestamp.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    sessions.record_upload("S1", "b.png", MediaKind::Image, None).await.unwrap();
    let second = sessions.get_session("S1").await.unwrap().timestamp.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn test_screenshots_do_not_count_as_images() {
    let (sessions, _) = manager();

    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    sessions
        .record_upload("S1", "shot.png", MediaKind::Screenshot, None)
        .await
        .unwrap();

    let session = sessions.get_session("S1").await.unwrap();
    assert_eq!(session.image_paths, vec!["a.png"]);
    assert_eq!(session.screenshot_paths, vec!["shot.png"]);

    sessions.replace_results("S1", results(&["happy"])).await.unwrap();
    assert!(sessions.check_analysis_available("S1").await.unwrap().is_available());
}

#[tokio::test]
async fn test_replace_results_overwrites_without_merging() {
    let (sessions, _) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    sessions.record_upload("S1", "b.png", MediaKind::Image, None).await.unwrap();

    sessions.replace_results("S1", results(&["happy", "sad"])).await.unwrap();
    let updated = sessions.replace_results("S1", results(&["angry"])).await.unwrap();

    assert_eq!(updated.model_response, results(&["angry"]));
    assert_eq!(sessions.session_results("S1").await.unwrap(), results(&["angry"]));
    // image list untouched
    assert_eq!(updated.image_paths, vec!["a.png", "b.png"]);
}

#[tokio::test]
async fn test_replace_results_with_empty_list() {
    let (sessions, _) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    sessions.replace_results("S1", results(&["happy"])).await.unwrap();

    let updated = sessions.replace_results("S1", Vec::new()).await.unwrap();
    assert!(updated.model_response.is_empty());
}

#[tokio::test]
async fn test_replace_results_requires_existing_session() {
    let (sessions, store) = manager();

    let err = sessions.replace_results("ghost", results(&["happy"])).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_check_analysis_available_invariant() {
    let (sessions, _) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    sessions.record_upload("S1", "b.png", MediaKind::Image, None).await.unwrap();

    // never analysed
    assert_eq!(
        sessions.check_analysis_available("S1").await.unwrap(),
        AnalysisAvailability::Unavailable { images: 2, results: 0 }
    );

    // partial run
    sessions.replace_results("S1", results(&["happy"])).await.unwrap();
    assert_eq!(
        sessions.check_analysis_available("S1").await.unwrap(),
        AnalysisAvailability::Unavailable { images: 2, results: 1 }
    );

    sessions.replace_results("S1", results(&["happy", "sad"])).await.unwrap();
    assert_eq!(
        sessions.check_analysis_available("S1").await.unwrap(),
        AnalysisAvailability::Available(results(&["happy", "sad"]))
    );

    // a new upload makes the stored results stale
    sessions.record_upload("S1", "c.png", MediaKind::Image, None).await.unwrap();
    assert!(!sessions.check_analysis_available("S1").await.unwrap().is_available());
}

#[tokio::test]
async fn test_check_analysis_available_missing_session() {
    let (sessions, _) = manager();

    let err = sessions.check_analysis_available("ghost").await.unwrap_err();
    assert!(matches!(err, MoodlensError::NotFound { resource_type: "session", .. }));
}

#[tokio::test]
async fn test_store_unreachable_is_storage_error() {
    let (sessions, store) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    store.disconnect();

    let err = sessions
        .record_upload("S1", "b.png", MediaKind::Image, None)
        .await
        .unwrap_err();
    assert!(err.is_storage());
    assert!(sessions.replace_results("S1", Vec::new()).await.unwrap_err().is_storage());
    assert!(sessions.check_analysis_available("S1").await.unwrap_err().is_storage());

    store.reconnect();
    assert_eq!(sessions.get_session("S1").await.unwrap().image_paths, vec!["a.png"]);
}

#[tokio::test]
async fn test_session_results_and_media_projections() {
    let (sessions, _) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, Some("Alpha")).await.unwrap();
    sessions.replace_results("S1", results(&["happy"])).await.unwrap();

    assert_eq!(sessions.session_media("S1").await.unwrap(), vec!["a.png"]);
    assert_eq!(sessions.session_results("S1").await.unwrap(), results(&["happy"]));

    assert!(sessions.session_media("ghost").await.unwrap_err().is_not_found());
    assert!(sessions.session_results("ghost").await.unwrap_err().is_not_found());
    assert!(sessions.find_session("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_sessions() {
    let (sessions, _) = manager();
    sessions.record_upload("S1", "a.png", MediaKind::Image, Some("Alpha")).await.unwrap();
    sessions.record_upload("S2", "b.png", MediaKind::Image, None).await.unwrap();

    let listed = sessions.list_sessions().await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].session_id, "S1");
    assert_eq!(listed[0].session_name, "Alpha");
    assert_eq!(listed[1].session_name, DEFAULT_SESSION_NAME);
    assert!(listed.iter().all(|summary| summary.timestamp[0].len() == 10));
}

#[tokio::test]
async fn test_next_child_name() {
    let (sessions, _) = manager();
    assert_eq!(sessions.next_child_name().await.unwrap(), "Child001");

    sessions.record_upload("S1", "a.png", MediaKind::Image, Some("Child001")).await.unwrap();
    sessions.record_upload("S2", "b.png", MediaKind::Image, Some("Child007")).await.unwrap();
    sessions.record_upload("S3", "c.png", MediaKind::Image, Some("Child12")).await.unwrap();
    sessions.record_upload("S4", "d.png", MediaKind::Image, Some("Other")).await.unwrap();

    assert_eq!(sessions.next_child_name().await.unwrap(), "Child008");
}

async fn json_dir_manager(dir: &tempfile::TempDir) -> SessionManager {
    let store = crate::storage::JsonDirStore::open(dir.path(), SESSION_KEY_FIELD)
        .await
        .unwrap();
    SessionManager::new(Arc::new(store))
}

#[tokio::test]
async fn test_long_multibyte_session_id_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let sessions = json_dir_manager(&dir).await;
    let session_id = "学生会话".repeat(8);

    sessions
        .record_upload(&session_id, "a.png", MediaKind::Image, None)
        .await
        .unwrap();
    sessions.replace_results(&session_id, results(&["happy"])).await.unwrap();

    assert!(sessions.check_analysis_available(&session_id).await.unwrap().is_available());
    let listed = sessions.list_sessions().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].session_id, session_id);
}

#[tokio::test]
async fn test_empty_session_id_visible_to_every_read() {
    let dir = tempfile::TempDir::new().unwrap();
    let sessions = json_dir_manager(&dir).await;

    sessions
        .record_upload("", "a.png", MediaKind::Image, Some("Child004"))
        .await
        .unwrap();

    assert_eq!(sessions.get_session("").await.unwrap().image_paths, vec!["a.png"]);
    assert_eq!(sessions.list_sessions().await.unwrap().len(), 1);
    assert_eq!(sessions.next_child_name().await.unwrap(), "Child005");
}
