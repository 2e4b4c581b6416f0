//! Core types for time-range filtering
//!
//! - `TimeFilter`: the filter tokens a user can pick
//! - `TimeRange`: a closed interval of UTC instants
//! - `QueryString`: the URL query derived from a range
//! - `ResolvedRange`: what the resolver hands to fetchers and widgets

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Seconds since the epoch for 9999-12-31T23:59:59Z
const FAR_FUTURE_SECS: i64 = 253_402_300_799;

/// Label shown for the unbounded sentinel range
pub const ALL_TIME_LABEL: &str = "of All Time";

/// Filter tokens accepted from the dashboard's range selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    /// User-supplied start/end strings
    Custom,
    /// Explicit request for the unbounded range
    All,
}

impl TimeFilter {
    /// Parse a token, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything outside the known set.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "hour" => Some(TimeFilter::Hour),
            "day" => Some(TimeFilter::Day),
            "week" => Some(TimeFilter::Week),
            "month" => Some(TimeFilter::Month),
            "year" => Some(TimeFilter::Year),
            "custom" => Some(TimeFilter::Custom),
            "all" => Some(TimeFilter::All),
            _ => None,
        }
    }

    /// Human label used in widget titles ("Posts in the Past Week")
    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "in the Past Hour",
            TimeFilter::Day => "in the Past Day",
            TimeFilter::Week => "in the Past Week",
            TimeFilter::Month => "in the Past Month",
            TimeFilter::Year => "in the Past Year",
            TimeFilter::Custom => "in a Custom Range",
            TimeFilter::All => ALL_TIME_LABEL,
        }
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFilter::Hour => write!(f, "hour"),
            TimeFilter::Day => write!(f, "day"),
            TimeFilter::Week => write!(f, "week"),
            TimeFilter::Month => write!(f, "month"),
            TimeFilter::Year => write!(f, "year"),
            TimeFilter::Custom => write!(f, "custom"),
            TimeFilter::All => write!(f, "all"),
        }
    }
}

/// Time range for API filters (closed interval: [start, end])
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a time range, returning None if start > end
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// The "all time" sentinel: epoch origin to the far-future sentinel
    pub fn all_time() -> Self {
        Self {
            start: DateTime::UNIX_EPOCH,
            end: DateTime::from_timestamp(FAR_FUTURE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whether this is the unbounded sentinel range
    pub fn is_all_time(&self) -> bool {
        *self == Self::all_time()
    }

    /// Check if an instant falls within this range
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Get the duration of the range
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Derive the `start_date`/`end_date` query.
    ///
    /// The sentinel range is unbounded, so it always yields the empty query.
    pub fn to_query(&self) -> QueryString {
        if self.is_all_time() {
            return QueryString::empty();
        }

        QueryString(format!(
            "start_date={}&end_date={}",
            urlencoding::encode(&iso8601(self.start)),
            urlencoding::encode(&iso8601(self.end)),
        ))
    }
}

/// Second-precision ISO-8601 with a `Z` suffix
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// URL query derived from a time range.
///
/// The empty string means "no filter"; fetchers then omit the date
/// parameters entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct QueryString(String);

impl QueryString {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into decoded key/value pairs for a request builder
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0
            .split('&')
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (key, value) = part.split_once('=')?;
                let value = urlencoding::decode(value).ok()?.into_owned();
                Some((key.to_string(), value))
            })
            .collect()
    }
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of the resolver: an optional range, its label and its query.
///
/// `range` is `None` only for unrecognized tokens, which means "no filter".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedRange {
    pub range: Option<TimeRange>,
    pub label: String,
    pub query: QueryString,
}

impl ResolvedRange {
    /// The empty resolution for unknown tokens
    pub fn unfiltered() -> Self {
        Self {
            range: None,
            label: String::new(),
            query: QueryString::empty(),
        }
    }

    /// The all-time sentinel resolution
    pub fn all_time() -> Self {
        Self {
            range: Some(TimeRange::all_time()),
            label: ALL_TIME_LABEL.to_string(),
            query: QueryString::empty(),
        }
    }

    pub(crate) fn bounded(range: TimeRange, label: impl Into<String>) -> Self {
        Self {
            query: range.to_query(),
            range: Some(range),
            label: label.into(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.range.is_none()
    }
}
