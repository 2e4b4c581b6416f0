//! Coordinate Fetcher
//!
//! Polls geocoded posts for one disaster category and keeps the last set
//! that passed validation. A failed refresh never blanks the map.

use crate::api::{decode_array, AnalyticsSource, ApiError, ApiResult, DisasterCategory, Endpoint};
use crate::range::QueryString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A geocoded post with its sentiment score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    /// Polarity in [-1, 1]
    pub sentiment: f64,
}

/// Fetch and validate coordinates for one category.
///
/// A body containing `NaN` is rejected as a whole; individual records with a
/// missing or non-finite `lat`/`lng` are dropped with a warning.
pub async fn fetch_coordinates(
    source: &dyn AnalyticsSource,
    category: DisasterCategory,
    query: &QueryString,
) -> ApiResult<Vec<Coordinate>> {
    let params = [("disaster_type", category.to_string())];
    let body = source.get_text(Endpoint::CoordinatesByLabel, &params, query).await?;

    if body.contains("NaN") {
        return Err(ApiError::NanSentinel);
    }

    let items = decode_array(&body)?;
    let total = items.len();
    let valid = validate_coordinates(items, category);

    tracing::debug!(%category, total, valid = valid.len(), "Fetched coordinates");
    Ok(valid)
}

/// Keep the records whose lat/lng are finite numbers
pub fn validate_coordinates(items: Vec<Value>, category: DisasterCategory) -> Vec<Coordinate> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let coordinate = parse_coordinate(&item);
            if coordinate.is_none() {
                tracing::warn!(%category, index, record = %item, "Dropping coordinate with invalid lat/lng");
            }
            coordinate
        })
        .collect()
}

fn parse_coordinate(item: &Value) -> Option<Coordinate> {
    let lat = finite_number(item.get("lat"))?;
    let lng = finite_number(item.get("lng"))?;
    let sentiment = finite_number(item.get("sentiment_scaled"))
        .or_else(|| finite_number(item.get("sentiment")))
        .unwrap_or(0.0);

    Some(Coordinate { lat, lng, sentiment })
}

/// A finite number, given either as a JSON number or a numeric string
fn finite_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Stateful fetcher holding the last good coordinate set for a category
pub struct CoordinateFetcher {
    source: Arc<dyn AnalyticsSource>,
    category: DisasterCategory,
    coordinates: Vec<Coordinate>,
    last_success: Option<DateTime<Utc>>,
}

impl CoordinateFetcher {
    pub fn new(source: Arc<dyn AnalyticsSource>, category: DisasterCategory) -> Self {
        Self {
            source,
            category,
            coordinates: Vec::new(),
            last_success: None,
        }
    }

    pub fn category(&self) -> DisasterCategory {
        self.category
    }

    /// Switch category, discarding coordinates of the previous one
    pub fn set_category(&mut self, category: DisasterCategory) {
        if category != self.category {
            self.category = category;
            self.coordinates.clear();
            self.last_success = None;
        }
    }

    /// Fetch again, replacing the current set only on success.
    ///
    /// Returns the number of valid coordinates now held.
    pub async fn refresh(&mut self, query: &QueryString) -> ApiResult<usize> {
        match fetch_coordinates(self.source.as_ref(), self.category, query).await {
            Ok(coordinates) => {
                self.coordinates = coordinates;
                self.last_success = Some(Utc::now());
                Ok(self.coordinates.len())
            }
            Err(e) => {
                tracing::warn!(
                    category = %self.category,
                    retained = self.coordinates.len(),
                    "Coordinate refresh failed, keeping previous set: {}",
                    e
                );
                Err(e)
            }
        }
    }

    /// Iterate the current set; each call starts from the beginning
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.coordinates.iter()
    }

    /// Snapshot of the current set
    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.coordinates.clone()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// When the held set was fetched
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StaticSource;
    use serde_json::json;

    const GOOD: &str = r#"[
        {"lat": 29.95, "lng": -90.07, "sentiment_scaled": -0.4},
        {"lat": 34.05, "lng": -118.24, "sentiment_scaled": 0.2}
    ]"#;

    #[test]
    fn test_validation_drops_invalid_records() {
        let items = vec![
            json!({"lat": 10.0, "lng": 20.0, "sentiment_scaled": 0.5}),
            json!({"lat": 10.0, "lng": null}),
            json!({"lat": "abc", "lng": 20.0}),
            json!({"lng": 20.0}),
            json!({"lat": "12.5", "lng": "-3.25"}),
        ];

        let valid = validate_coordinates(items, DisasterCategory::Flood);
        assert_eq!(
            valid,
            vec![
                Coordinate { lat: 10.0, lng: 20.0, sentiment: 0.5 },
                Coordinate { lat: 12.5, lng: -3.25, sentiment: 0.0 },
            ]
        );
    }

    #[test]
    fn test_valid_record_passes_unchanged() {
        let valid = validate_coordinates(
            vec![json!({"lat": 1.5, "lng": 2.5, "sentiment": -1.0})],
            DisasterCategory::Hurricane,
        );
        assert_eq!(valid, vec![Coordinate { lat: 1.5, lng: 2.5, sentiment: -1.0 }]);
    }

    #[tokio::test]
    async fn test_nan_body_is_rejected() {
        let source = StaticSource::new().body(
            Endpoint::CoordinatesByLabel,
            Some(DisasterCategory::Flood),
            r#"[{"lat": NaN, "lng": 1.0}]"#,
        );

        let err = fetch_coordinates(&source, DisasterCategory::Flood, &QueryString::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NanSentinel));
    }

    #[tokio::test]
    async fn test_failed_refresh_retains_previous_set() {
        let source = Arc::new(StaticSource::new().body(
            Endpoint::CoordinatesByLabel,
            Some(DisasterCategory::Flood),
            GOOD,
        ));
        let mut fetcher = CoordinateFetcher::new(source.clone(), DisasterCategory::Flood);

        assert_eq!(fetcher.refresh(&QueryString::empty()).await.unwrap(), 2);

        for bad in ["", "not json", "{\"lat\": 1}", "[{\"lat\": NaN}]"] {
            source.set_body(Endpoint::CoordinatesByLabel, Some(DisasterCategory::Flood), bad);
            assert!(fetcher.refresh(&QueryString::empty()).await.is_err());
            assert_eq!(fetcher.len(), 2, "set dropped after body {:?}", bad);
        }

        source.set_unavailable(Endpoint::CoordinatesByLabel, Some(DisasterCategory::Flood));
        assert!(fetcher.refresh(&QueryString::empty()).await.is_err());
        assert_eq!(fetcher.coordinates().count(), 2);
        assert_eq!(fetcher.coordinates().count(), 2);
    }

    #[tokio::test]
    async fn test_successful_empty_fetch_replaces_set() {
        let source = Arc::new(StaticSource::new().body(
            Endpoint::CoordinatesByLabel,
            Some(DisasterCategory::Flood),
            GOOD,
        ));
        let mut fetcher = CoordinateFetcher::new(source.clone(), DisasterCategory::Flood);
        fetcher.refresh(&QueryString::empty()).await.unwrap();

        source.set_body(Endpoint::CoordinatesByLabel, Some(DisasterCategory::Flood), "[]");
        assert_eq!(fetcher.refresh(&QueryString::empty()).await.unwrap(), 0);
        assert!(fetcher.is_empty());
    }

    #[tokio::test]
    async fn test_category_switch_clears_set() {
        let source = Arc::new(StaticSource::new().body(
            Endpoint::CoordinatesByLabel,
            Some(DisasterCategory::Flood),
            GOOD,
        ));
        let mut fetcher = CoordinateFetcher::new(source, DisasterCategory::Flood);
        fetcher.refresh(&QueryString::empty()).await.unwrap();

        fetcher.set_category(DisasterCategory::Wildfire);
        assert!(fetcher.is_empty());
        assert!(fetcher.last_success().is_none());
    }
}
