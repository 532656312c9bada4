//! CLI output helpers

use colored::*;
use moodlens_core::MoodlensError;
use serde::Serialize;
use serde_json::json;

/// Print a response body as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => error(&format!("failed to render response: {}", e)),
    }
}

/// Report an error: status line on stderr, message body on stdout
pub fn print_error(err: &MoodlensError) {
    error(&format!(
        "[{} {}] {}",
        err.status_code(),
        err.category().display_name(),
        err
    ));
    print_json(&error_body(err));
}

pub fn error_body(err: &MoodlensError) -> serde_json::Value {
    json!({
        "status": err.status_code(),
        "message": err.to_string(),
    })
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message.green());
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}
