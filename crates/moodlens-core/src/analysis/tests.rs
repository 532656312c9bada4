use super::*;
use crate::config::InferenceConfig;
use crate::error::{InferenceErrorKind, IoErrorKind, MoodlensError};
use crate::inference::{AnalysisResult, InferenceGateway};
use crate::session::{AnalysisAvailability, MediaKind, SessionManager};
use crate::storage::{MemoryStore, SESSION_KEY_FIELD, SharedStore};
use crate::testing::{MemoryImageSource, RecordingObserver, ScriptedTransport};
use serde_json::json;
use std::sync::Arc;

struct Fixture {
    runner: BatchRunner,
    sessions: SessionManager,
    transport: Arc<ScriptedTransport>,
    observer: Arc<RecordingObserver>,
    store: Arc<MemoryStore>,
}

fn fixture(transport: ScriptedTransport, source: MemoryImageSource) -> Fixture {
    let store = Arc::new(MemoryStore::new(SESSION_KEY_FIELD));
    let shared: SharedStore = store.clone();
    let sessions = SessionManager::new(shared);
    let transport = Arc::new(transport);
    let observer = Arc::new(RecordingObserver::new());
    let gateway = InferenceGateway::new(transport.clone(), &InferenceConfig::default());
    let runner = BatchRunner::new(gateway, Arc::new(source), sessions.clone(), observer.clone());

    Fixture {
        runner,
        sessions,
        transport,
        observer,
        store,
    }
}

fn refs(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn label(name: &str) -> serde_json::Value {
    json!([{"label": name, "score": 0.8}])
}

#[tokio::test]
async fn test_partial_failure_skips_missing_image() {
    let source = MemoryImageSource::new()
        .with_image("a.png", b"a".to_vec())
        .with_image("c.png", b"c".to_vec());
    let transport = ScriptedTransport::new()
        .success(label("happy"))
        .success(label("sad"));
    let f = fixture(transport, source);

    for reference in ["a.png", "b.png", "c.png"] {
        f.sessions
            .record_upload("S1", reference, MediaKind::Image, None)
            .await
            .unwrap();
    }

    let run = f
        .runner
        .run_batch("S1", &refs(&["a.png", "b.png", "c.png"]))
        .await
        .unwrap();

    assert_eq!(
        run.results,
        vec![AnalysisResult::new(label("happy")), AnalysisResult::new(label("sad"))]
    );
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].reference, "b.png");
    assert!(matches!(
        run.failures[0].error,
        MoodlensError::Io {
            kind: IoErrorKind::NotFound,
            ..
        }
    ));
    // the missing image never reached the endpoint
    assert_eq!(f.transport.attempts(), 2);

    let outcome = run.persistence.wait().await;
    assert!(outcome.is_saved());
    assert_eq!(f.observer.persisted(), vec![("S1".to_string(), 2)]);

    assert_eq!(f.sessions.session_results("S1").await.unwrap().len(), 2);
    assert_eq!(
        f.sessions.check_analysis_available("S1").await.unwrap(),
        AnalysisAvailability::Unavailable { images: 3, results: 2 }
    );
}

#[tokio::test]
async fn test_inference_failure_is_skipped() {
    let source = MemoryImageSource::new()
        .with_image("a.png", b"a".to_vec())
        .with_image("b.png", b"b".to_vec());
    let transport = ScriptedTransport::new().bad_request().success(label("neutral"));
    let f = fixture(transport, source);
    f.sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    f.sessions.record_upload("S1", "b.png", MediaKind::Image, None).await.unwrap();

    let run = f.runner.run_batch("S1", &refs(&["a.png", "b.png"])).await.unwrap();

    assert_eq!(run.results, vec![AnalysisResult::new(label("neutral"))]);
    assert_eq!(
        run.failures[0].error.inference_kind(),
        Some(InferenceErrorKind::BadRequest)
    );
    assert!(run.persistence.wait().await.is_saved());
}

#[tokio::test]
async fn test_full_batch_makes_analysis_available() {
    let source = MemoryImageSource::new()
        .with_image("a.png", b"a".to_vec())
        .with_image("b.png", b"b".to_vec());
    let transport = ScriptedTransport::new().success(label("happy")).success(label("sad"));
    let f = fixture(transport, source);
    f.sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    f.sessions.record_upload("S1", "b.png", MediaKind::Image, None).await.unwrap();

    let run = f.runner.run_batch("S1", &refs(&["a.png", "b.png"])).await.unwrap();
    assert!(run.failures.is_empty());
    run.persistence.wait().await;

    let availability = f.sessions.check_analysis_available("S1").await.unwrap();
    assert_eq!(availability, AnalysisAvailability::Available(run.results));
}

#[tokio::test]
async fn test_empty_references_rejected() {
    let f = fixture(ScriptedTransport::new(), MemoryImageSource::new());

    let err = f.runner.run_batch("S1", &[]).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(f.transport.attempts(), 0);
    assert!(f.store.is_empty().await);
}

#[tokio::test]
async fn test_all_items_failing_persists_empty_list() {
    let f = fixture(ScriptedTransport::new(), MemoryImageSource::new());
    f.sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    f.sessions.replace_results("S1", vec![AnalysisResult::new(label("old"))]).await.unwrap();

    let run = f.runner.run_batch("S1", &refs(&["a.png"])).await.unwrap();

    assert!(run.results.is_empty());
    assert_eq!(run.failures.len(), 1);
    match run.persistence.wait().await {
        PersistenceOutcome::Saved { result_count } => assert_eq!(result_count, 0),
        other => panic!("expected saved outcome, got {:?}", other),
    }
    assert!(f.sessions.session_results("S1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_session_reports_persist_failure() {
    let source = MemoryImageSource::new().with_image("a.png", b"a".to_vec());
    let f = fixture(ScriptedTransport::new().success(label("happy")), source);

    let run = f.runner.run_batch("ghost", &refs(&["a.png"])).await.unwrap();

    // results still reach the caller
    assert_eq!(run.results.len(), 1);

    match run.persistence.wait().await {
        PersistenceOutcome::Failed(error) => assert!(error.is_not_found()),
        other => panic!("expected failed outcome, got {:?}", other),
    }
    let failed = f.observer.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "ghost");
    assert!(f.observer.persisted().is_empty());
    // no session was created by the write
    assert!(f.sessions.find_session("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_outage_during_persist_is_reported() {
    let source = MemoryImageSource::new().with_image("a.png", b"a".to_vec());
    let f = fixture(ScriptedTransport::new().success(label("happy")), source);
    f.sessions.record_upload("S1", "a.png", MediaKind::Image, None).await.unwrap();
    f.store.disconnect();

    let run = f.runner.run_batch("S1", &refs(&["a.png"])).await.unwrap();

    assert_eq!(run.results.len(), 1);
    match run.persistence.wait().await {
        PersistenceOutcome::Failed(error) => assert!(error.is_storage()),
        other => panic!("expected failed outcome, got {:?}", other),
    }
    assert_eq!(f.observer.failed().len(), 1);
}
