//! Session inspection commands

use crate::args::SessionsAction;
use crate::console;
use colored::Colorize;
use moodlens_core::{AnalysisService, MoodlensResult};
use serde_json::json;

/// Execute sessions command
pub async fn execute(service: &AnalysisService, action: SessionsAction) -> MoodlensResult<()> {
    match action {
        SessionsAction::List => list(service).await,
        SessionsAction::Show { session_id } => {
            console::print_json(&service.session_detail(&session_id).await?);
            Ok(())
        }
        SessionsAction::Results { session_id } => {
            let results = service.session_results(&session_id).await?;
            console::print_json(&json!({ "modelResponse": results }));
            Ok(())
        }
        SessionsAction::Media { session_id } => {
            let image_paths = service.session_media(&session_id).await?;
            console::print_json(&json!({ "imagePaths": image_paths }));
            Ok(())
        }
    }
}

async fn list(service: &AnalysisService) -> MoodlensResult<()> {
    let sessions = service.list_sessions().await?;
    if sessions.is_empty() {
        eprintln!("{}", "No sessions found.".yellow());
    }
    console::print_json(&sessions);
    Ok(())
}

/// Print the next free ChildNNN name
pub async fn next_child(service: &AnalysisService) -> MoodlensResult<()> {
    let name = service.next_child_name().await?;
    console::print_json(&json!({ "nextChildName": name }));
    Ok(())
}
