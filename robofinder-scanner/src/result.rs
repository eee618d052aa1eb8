use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the 14-digit capture timestamps used by the archive
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// One capture listed by the archive index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    pub timestamp: String,
    pub original: String,
}

impl TimestampEntry {
    pub fn new(timestamp: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            original: original.into(),
        }
    }

    /// Capture time, if the timestamp is a well-formed 14-digit archive timestamp
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, ARCHIVE_TIMESTAMP_FORMAT).ok()
    }
}

/// Raw body of an archived capture
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entry: TimestampEntry,
    pub url: String,
    pub body: String,
}
