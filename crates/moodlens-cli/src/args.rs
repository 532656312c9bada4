//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use moodlens_core::MediaKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moodlens")]
#[command(about = "Moodlens - session-oriented facial-expression analysis")]
#[command(
    long_about = r#"Moodlens - session-oriented facial-expression analysis

USAGE:
  moodlens upload <session> <file>     # Store an image and record it
  moodlens analyze <session> --all     # Analyze every image of a session
  moodlens check <session>             # Results, if every image has one
  moodlens sessions list               # List sessions
  moodlens next-child                  # Next free ChildNNN name

For detailed help: moodlens --help"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (default: moodlens.toml)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy a file into the uploads directory and record it on a session
    Upload {
        /// Session identifier (created if absent)
        session_id: String,

        /// File to upload
        file: PathBuf,

        /// Media kind: image or screenshot
        #[arg(long, default_value = "image", value_parser = parse_media_kind)]
        kind: MediaKind,

        /// Session name to set
        #[arg(long)]
        name: Option<String>,
    },

    /// Run batch analysis over image references
    Analyze {
        /// Session identifier
        session_id: String,

        /// Image references to analyze
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        images: Vec<String>,

        /// Analyze every image recorded on the session
        #[arg(long)]
        all: bool,
    },

    /// Print the stored analysis if it covers every image
    Check {
        /// Session identifier
        session_id: String,
    },

    /// Inspect stored sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },

    /// Print the next free ChildNNN session name
    NextChild,
}

#[derive(Subcommand, Clone)]
pub enum SessionsAction {
    /// List all sessions
    List,
    /// Show a full session document
    Show { session_id: String },
    /// Show stored results, complete or not
    Results { session_id: String },
    /// Show stored image references
    Media { session_id: String },
}

fn parse_media_kind(value: &str) -> Result<MediaKind, String> {
    value.parse::<MediaKind>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::parse_from([
            "moodlens", "upload", "S1", "face.png", "--kind", "screenshot", "--name", "Alpha",
        ]);
        match cli.command {
            Commands::Upload {
                session_id,
                file,
                kind,
                name,
            } => {
                assert_eq!(session_id, "S1");
                assert_eq!(file, PathBuf::from("face.png"));
                assert_eq!(kind, MediaKind::Screenshot);
                assert_eq!(name.as_deref(), Some("Alpha"));
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_analyze_requires_images_or_all() {
        assert!(Cli::try_parse_from(["moodlens", "analyze", "S1"]).is_err());
        assert!(Cli::try_parse_from(["moodlens", "analyze", "S1", "a.png", "--all"]).is_err());
        assert!(Cli::try_parse_from(["moodlens", "analyze", "S1", "--all"]).is_ok());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["moodlens", "upload", "S1", "a.mp4", "--kind", "video"]).is_err());
    }
}
