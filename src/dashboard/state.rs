//! Widget state published to the presentation layer

use crate::api::{ApiError, DisasterCategory};
use crate::range::{QueryString, RangeSelection};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Inputs a widget's refresh loop is keyed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInputs {
    /// Set only for widgets that follow the dashboard's time filter
    pub range: Option<RangeSelection>,
    /// Set only for widgets that follow the selected category
    pub category: Option<DisasterCategory>,
}

impl WidgetInputs {
    /// Pin the inputs to one refresh cycle
    pub fn at(&self, now: DateTime<Utc>) -> LoadRequest {
        LoadRequest {
            query: self
                .range
                .as_ref()
                .map(|range| range.resolve(now).query)
                .unwrap_or_default(),
            category: self.category,
            now,
        }
    }
}

/// What one refresh cycle loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub query: QueryString,
    pub category: Option<DisasterCategory>,
    /// Clock reading the query was resolved against
    pub now: DateTime<Utc>,
}

/// Latest data for one widget.
///
/// A failed refresh keeps `data` from the last good cycle and records the
/// error, so the display shows stale data rather than nothing.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetState<T> {
    pub data: Option<T>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for WidgetState<T> {
    fn default() -> Self {
        Self {
            data: None,
            last_error: None,
            updated_at: None,
        }
    }
}

impl<T> WidgetState<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold one refresh result into the state
    pub fn apply(&mut self, result: Result<T, ApiError>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.last_error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Nothing has loaded yet and nothing has failed
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.last_error.is_none()
    }

    /// Showing data from an earlier cycle because the latest one failed
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.last_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_resolve_per_cycle() {
        let now = Utc::now();
        let inputs = WidgetInputs {
            range: Some(RangeSelection::new("hour", None)),
            category: Some(DisasterCategory::Flood),
        };

        let first = inputs.at(now);
        let second = inputs.at(now + chrono::Duration::seconds(60));
        assert_ne!(first.query, second.query);
        assert_eq!(second.category, Some(DisasterCategory::Flood));

        let unfiltered = WidgetInputs {
            range: None,
            category: None,
        };
        assert!(unfiltered.at(now).query.is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut state = WidgetState::empty();
        assert!(state.is_loading());

        state.apply(Ok(vec![1, 2, 3]));
        assert_eq!(state.data, Some(vec![1, 2, 3]));
        assert!(state.updated_at.is_some());

        state.apply(Err(ApiError::NanSentinel));
        assert_eq!(state.data, Some(vec![1, 2, 3]));
        assert!(state.is_stale());

        state.apply(Ok(vec![]));
        assert_eq!(state.data, Some(vec![]));
        assert!(state.last_error.is_none());
    }
}
