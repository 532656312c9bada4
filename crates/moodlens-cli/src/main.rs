//! Moodlens CLI application
//!
//! Front end for the session analysis core: record uploads, run batch
//! analysis against the inference endpoint and inspect stored sessions.
//!
//! ```bash
//! moodlens upload S1 face.png --name Alpha
//! moodlens analyze S1 --all
//! moodlens check S1
//! ```
//!
//! Responses are printed to stdout as JSON; logs go to stderr. Set
//! `RUST_LOG=debug` (or `MOODLENS_LOG_LEVEL`) for verbose logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use anyhow::Context;
use clap::Parser;

pub use args::{Cli, Commands, SessionsAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = moodlens_core::load_config(cli.config_file.as_deref())
        .context("failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);
    logging::report_config(cli.config_file.as_deref(), &config);

    if let Err(error) = router::route(cli, config).await {
        console::print_error(&error);
        std::process::exit(1);
    }
    Ok(())
}
