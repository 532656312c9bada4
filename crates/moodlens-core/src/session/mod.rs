//! Session records and the consistency manager that owns them

mod manager;
mod naming;
mod types;

#[cfg(test)]
mod manager_tests;

pub use manager::SessionManager;
pub use naming::{CHILD_NAME_PATTERN, next_child_name};
pub use types::{
    AnalysisAvailability, DEFAULT_SESSION_NAME, MediaKind, Session, SessionSummary,
    format_us_timestamp,
};
