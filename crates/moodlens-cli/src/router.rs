//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use moodlens_core::{AnalysisService, AppConfig, MoodlensResult};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: AppConfig) -> MoodlensResult<()> {
    let service = AnalysisService::from_config(&config).await?;

    match cli.command {
        Commands::Upload {
            session_id,
            file,
            kind,
            name,
        } => {
            commands::upload::execute(
                &service,
                &config.uploads,
                &session_id,
                &file,
                kind,
                name.as_deref(),
            )
            .await
        }
        Commands::Analyze {
            session_id,
            images,
            all,
        } => commands::analyze::execute(&service, &session_id, images, all).await,
        Commands::Check { session_id } => commands::analyze::check(&service, &session_id).await,
        Commands::Sessions { action } => commands::sessions::execute(&service, action).await,
        Commands::NextChild => commands::sessions::next_child(&service).await,
    }
}
