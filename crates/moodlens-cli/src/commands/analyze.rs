//! Analyze and check commands

use crate::console;
use moodlens_core::{AnalysisService, MoodlensResult, PersistenceOutcome};

/// Run a batch over `images`, or over every recorded image with `all`.
///
/// Waits for the detached write before returning so the process does not
/// exit under it.
pub async fn execute(
    service: &AnalysisService,
    session_id: &str,
    images: Vec<String>,
    all: bool,
) -> MoodlensResult<()> {
    let images = if all {
        service.session_media(session_id).await?
    } else {
        images
    };

    let outcome = service.analyze_refs(session_id, &images).await?;

    for failure in &outcome.failures {
        console::warn(&format!("skipped {}: {}", failure.reference, failure.error));
    }
    console::print_json(&outcome.response);

    match outcome.persistence.wait().await {
        PersistenceOutcome::Saved { result_count } => {
            console::success(&format!("saved {} result(s) to session {}", result_count, session_id));
        }
        PersistenceOutcome::Failed(error) => {
            console::warn(&format!("results were not saved: {}", error));
        }
    }
    Ok(())
}

/// Print the stored analysis, or a not-found message when incomplete
pub async fn check(service: &AnalysisService, session_id: &str) -> MoodlensResult<()> {
    let response = service.check_analysis(session_id).await?;
    console::print_json(&response);
    Ok(())
}
