//! Session data types

use crate::error::{MoodlensError, MoodlensResult};
use crate::inference::AnalysisResult;
use crate::storage::Document;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name given to a session created without one
pub const DEFAULT_SESSION_NAME: &str = "Unnamed Session";

fn default_session_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

/// Which list an uploaded reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Screenshot,
}

impl MediaKind {
    /// Document field holding references of this kind
    pub fn field(&self) -> &'static str {
        match self {
            Self::Image => "imagePaths",
            Self::Screenshot => "screenshotPaths",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Screenshot => write!(f, "screenshot"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = MoodlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "screenshot" => Ok(Self::Screenshot),
            other => Err(MoodlensError::malformed(format!("unknown media kind '{}'", other))),
        }
    }
}

/// A stored session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(default = "default_session_name")]
    pub session_name: String,
    /// Last upload time
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub screenshot_paths: Vec<String>,
    /// Results of the latest analysis run
    #[serde(default)]
    pub model_response: Vec<AnalysisResult>,
}

impl Session {
    /// Decode a stored document
    pub fn from_document(document: Document) -> MoodlensResult<Self> {
        serde_json::from_value(serde_json::Value::Object(document)).map_err(|e| {
            MoodlensError::storage_with_context(
                format!("Malformed session document: {}", e),
                "decoding session",
            )
        })
    }

    /// True iff every image has a result: both lists non-empty and equally long.
    ///
    /// False is a normal state (not analysed yet, or the last run skipped
    /// items), never a sign of corruption.
    pub fn analysis_complete(&self) -> bool {
        !self.model_response.is_empty() && self.model_response.len() == self.image_paths.len()
    }
}

/// Outcome of checking an existing session's analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisAvailability {
    Available(Vec<AnalysisResult>),
    Unavailable { images: usize, results: usize },
}

impl AnalysisAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Listing entry for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub session_name: String,
    /// `[MM/DD/YYYY, hh:mm:ss AM|PM]`, empty strings when never stamped
    pub timestamp: [String; 2],
}

impl SessionSummary {
    /// Summarize with timestamps rendered in the local time zone
    pub fn from_session(session: &Session) -> Self {
        let timestamp = session
            .timestamp
            .map(|ts| format_us_timestamp(&ts.with_timezone(&Local)))
            .unwrap_or_default();
        Self {
            session_id: session.session_id.clone(),
            session_name: session.session_name.clone(),
            timestamp,
        }
    }
}

/// Render a timestamp as US date and 12-hour time
pub fn format_us_timestamp<Tz>(timestamp: &DateTime<Tz>) -> [String; 2]
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    [
        timestamp.format("%m/%d/%Y").to_string(),
        timestamp.format("%I:%M:%S %p").to_string(),
    ]
}
