//! Pipeline log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome recorded for a single pipeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Failed,
}

/// One event in a failure chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub title: String,
    pub status: LogStatus,
    pub timestamp: String,
    /// Stage-specific payload, kept as free-form JSON
    pub data: Value,
    pub summary: String,
}

impl LogEntry {
    pub fn stage(&self) -> Option<LogStage> {
        LogStage::from_title(&self.title)
    }

    pub fn is_failure(&self) -> bool {
        self.status == LogStatus::Failed
    }

    /// Timestamp formatted for display, or the raw value when it is not RFC 3339
    pub fn display_timestamp(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| {
                ts.with_timezone(&Utc)
                    .format("%b %-d, %Y %H:%M:%S%.3f UTC")
                    .to_string()
            })
            .unwrap_or_else(|_| self.timestamp.clone())
    }

    /// Look up a nested field in `data` by key path
    pub fn data_field(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.data, |value, key| value.get(*key))
    }
}

/// The five stages of an ad render attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogStage {
    PageLoad,
    BidStart,
    BidComplete,
    RenderStart,
    RenderFailure,
}

impl LogStage {
    pub const ALL: [LogStage; 5] = [
        LogStage::PageLoad,
        LogStage::BidStart,
        LogStage::BidComplete,
        LogStage::RenderStart,
        LogStage::RenderFailure,
    ];

    /// Map a log title onto a stage. Titles are matched after normalization,
    /// so "Render Failure", "render failure" and "render-failure" are equal.
    pub fn from_title(title: &str) -> Option<Self> {
        let key = normalize_title(title);
        Self::ALL.into_iter().find(|stage| stage.key() == key)
    }

    /// Normalized lookup key, e.g. `bid-complete`
    pub fn key(&self) -> &'static str {
        match self {
            LogStage::PageLoad => "page-load",
            LogStage::BidStart => "bid-start",
            LogStage::BidComplete => "bid-complete",
            LogStage::RenderStart => "render-start",
            LogStage::RenderFailure => "render-failure",
        }
    }

    /// Title as it appears in logs and in per-stage summary maps
    pub fn title(&self) -> &'static str {
        match self {
            LogStage::PageLoad => "Page Load",
            LogStage::BidStart => "Bid Start",
            LogStage::BidComplete => "Bid Complete",
            LogStage::RenderStart => "Render Start",
            LogStage::RenderFailure => "Render Failure",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Lowercase the title and replace spaces with dashes
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}
