//! Time Range Resolver
//!
//! Turns a filter token (plus optional custom boundaries) into a
//! [`ResolvedRange`]. Resolution never fails: bad custom input falls back to
//! the all-time sentinel and unknown tokens resolve to "no filter".

use super::types::{ResolvedRange, TimeFilter, TimeRange};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source of "now" for resolving named windows
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The wall clock
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Which side of a custom range a boundary string describes.
///
/// A date-only end boundary covers the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

/// Resolve a filter token against the current clock
pub fn resolve_now(token: &str, custom: Option<(&str, &str)>) -> ResolvedRange {
    resolve(token, custom, Utc::now())
}

/// Resolve a filter token against an explicit `now`
pub fn resolve(token: &str, custom: Option<(&str, &str)>, now: DateTime<Utc>) -> ResolvedRange {
    let Some(filter) = TimeFilter::parse(token) else {
        tracing::debug!("Unrecognized time filter {:?}, applying no filter", token);
        return ResolvedRange::unfiltered();
    };

    match filter {
        TimeFilter::Custom => resolve_custom(custom, now),
        TimeFilter::All => ResolvedRange::all_time(),
        named => {
            let start = start_of_window(named, now);
            ResolvedRange::bounded(TimeRange { start, end: now }, named.label())
        }
    }
}

/// A filter choice as the user made it, before it is pinned to instants.
///
/// Named windows ("hour", "week", ...) slide with the clock, so a selection
/// is resolved again on every refresh rather than once when it is picked.
/// Custom boundaries are kept only for the `custom` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSelection {
    token: String,
    custom: Option<(String, String)>,
}

impl RangeSelection {
    pub fn new(token: &str, custom: Option<(&str, &str)>) -> Self {
        let token = token.trim().to_ascii_lowercase();
        let custom = match TimeFilter::parse(&token) {
            Some(TimeFilter::Custom) => custom.map(|(start, end)| (start.trim().to_string(), end.trim().to_string())),
            _ => None,
        };
        Self { token, custom }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn custom(&self) -> Option<(&str, &str)> {
        self.custom.as_ref().map(|(start, end)| (start.as_str(), end.as_str()))
    }

    /// Resolve against an explicit `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> ResolvedRange {
        resolve(&self.token, self.custom(), now)
    }
}

/// Start of a named window ending at `now`.
///
/// Month and year step back by calendar months, clamping to the last day of
/// the target month (Mar 31 minus one month is Feb 28/29).
fn start_of_window(filter: TimeFilter, now: DateTime<Utc>) -> DateTime<Utc> {
    match filter {
        TimeFilter::Hour => now - Duration::hours(1),
        TimeFilter::Day => now - Duration::days(1),
        TimeFilter::Week => now - Duration::days(7),
        TimeFilter::Month => now
            .checked_sub_months(Months::new(1))
            .unwrap_or(now - Duration::days(30)),
        TimeFilter::Year => now
            .checked_sub_months(Months::new(12))
            .unwrap_or(now - Duration::days(365)),
        TimeFilter::Custom | TimeFilter::All => now,
    }
}

fn resolve_custom(custom: Option<(&str, &str)>, now: DateTime<Utc>) -> ResolvedRange {
    let Some((start_raw, end_raw)) = custom else {
        tracing::warn!("Custom range selected without boundaries, using all time");
        return ResolvedRange::all_time();
    };

    let start = parse_boundary(start_raw, Boundary::Start);
    let end = parse_boundary(end_raw, Boundary::End);

    let (Some(start), Some(end)) = (start, end) else {
        tracing::warn!(
            start = %start_raw,
            end = %end_raw,
            "Unparseable custom range, using all time"
        );
        return ResolvedRange::all_time();
    };

    match TimeRange::try_new(start, end) {
        Some(range) => {
            if range.end > now {
                tracing::debug!("Custom range ends in the future ({})", range.end);
            }
            let label = format!(
                "from {} to {}",
                range.start.format("%Y-%m-%d"),
                range.end.format("%Y-%m-%d")
            );
            ResolvedRange::bounded(range, label)
        }
        None => {
            tracing::warn!(
                start = %start,
                end = %end,
                "Custom range starts after it ends, using all time"
            );
            ResolvedRange::all_time()
        }
    }
}

/// Parse a custom boundary string.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD HH:MM:SS` (read as
/// UTC) and bare `YYYY-MM-DD` dates.
pub fn parse_boundary(raw: &str, boundary: Boundary) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let naive = match boundary {
        Boundary::Start => date.and_hms_opt(0, 0, 0)?,
        Boundary::End => date.and_hms_opt(23, 59, 59)?,
    };
    Some(naive.and_utc())
}
