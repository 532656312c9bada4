//! CLI commands

pub mod analyze;
pub mod sessions;
pub mod upload;
