//! Data Transfer Objects
//!
//! Response types for the analytics endpoints, deserialized from JSON.
//! Field aliases cover the names different API revisions have used.

use serde::{Deserialize, Serialize};

// ============================================
// LABEL DISTRIBUTION DTOs
// ============================================

/// `GET /fetch-label-count` response body
#[derive(Debug, Clone, Deserialize)]
pub struct LabelCountResponse {
    /// Total number of labelled posts
    #[serde(rename = "total label count", default)]
    pub total: Option<u64>,
    /// Per-label counts and shares
    #[serde(default)]
    pub results: Vec<LabelCount>,
    /// Set when the API could not compute the distribution
    #[serde(default)]
    pub error: Option<String>,
}

/// Count and share of posts for one label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelCount {
    pub label: String,
    #[serde(default)]
    pub count: u64,
    /// Share of all posts, 0-100
    pub percentage: f64,
}

// ============================================
// KEYWORD DTOs
// ============================================

/// One entry of `GET /fetch-most-frequent-word`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordCount {
    #[serde(alias = "text")]
    pub keyword: String,
    #[serde(alias = "value")]
    pub count: u64,
}

/// Word frequency payloads: the current list form and the legacy
/// `{"count of each word": [[text, count], ...]}` form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WordsPayload {
    List(Vec<WordCount>),
    Legacy {
        #[serde(rename = "count of each word")]
        words: Vec<(String, u64)>,
    },
}

impl WordsPayload {
    pub(crate) fn into_words(self) -> Vec<WordCount> {
        match self {
            WordsPayload::List(words) => words,
            WordsPayload::Legacy { words } => words
                .into_iter()
                .map(|(keyword, count)| WordCount { keyword, count })
                .collect(),
        }
    }
}

// ============================================
// TIME SERIES DTOs
// ============================================

/// X-axis label of a time series.
///
/// The API reports daily buckets as `YYYY-MM-DD` strings; numeric
/// timestamps are also accepted. Numbers order numerically and before any
/// text, text orders lexicographically (ISO dates sort chronologically).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum SeriesLabel {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for SeriesLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesLabel::Number(n) => write!(f, "{}", n),
            SeriesLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SeriesLabel {
    fn from(n: i64) -> Self {
        SeriesLabel::Number(n)
    }
}

impl From<&str> for SeriesLabel {
    fn from(s: &str) -> Self {
        SeriesLabel::Text(s.to_string())
    }
}

/// One bucket of `GET /fetch-posts-over-time`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostCount {
    pub timestamp: SeriesLabel,
    #[serde(alias = "post_count")]
    pub count: u64,
}

impl PostCount {
    pub fn new(timestamp: impl Into<SeriesLabel>, count: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            count,
        }
    }
}

// ============================================
// SUMMARY DTOs
// ============================================

/// `GET /fetch-top-disaster-last-day` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopDisaster {
    #[serde(default)]
    pub top_label: Option<String>,
    #[serde(default, alias = "location")]
    pub top_location: Option<String>,
    /// Explanation sent instead of a label when nothing was posted
    #[serde(rename = "Label", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One post of `GET /fetch-text-from-label`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedPost {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
