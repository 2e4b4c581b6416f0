//! Typed endpoint calls
//!
//! Thin wrappers over [`AnalyticsSource`] that decode each endpoint's JSON
//! and reject payloads the API flags as errors.

use super::category::DisasterCategory;
use super::client::{AnalyticsSource, Endpoint};
use super::dto::{FeedPost, LabelCountResponse, LabelCount, PostCount, TopDisaster, WordCount, WordsPayload};
use super::error::{ApiError, ApiResult};
use crate::range::QueryString;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a response body, treating blank bodies as an error
pub fn decode_json<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    if body.trim().is_empty() {
        return Err(ApiError::EmptyBody);
    }
    Ok(serde_json::from_str(body)?)
}

/// Decode a body that must be a JSON array, honoring `{"error": ...}` objects
pub fn decode_array(body: &str) -> ApiResult<Vec<Value>> {
    match decode_json::<Value>(body)? {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("error") {
            Some(err) => Err(ApiError::Reported(value_text(err))),
            None => Err(ApiError::UnexpectedShape("expected an array, got an object".into())),
        },
        other => Err(ApiError::UnexpectedShape(format!("expected an array, got {}", other))),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn category_param(category: Option<DisasterCategory>) -> Vec<(&'static str, String)> {
    category
        .map(|c| vec![("disaster_type", c.to_string())])
        .unwrap_or_default()
}

/// Fetch the share of posts per label
pub async fn fetch_label_counts(
    source: &dyn AnalyticsSource,
    query: &QueryString,
) -> ApiResult<Vec<LabelCount>> {
    let body = source.get_text(Endpoint::LabelCount, &[], query).await?;
    let response: LabelCountResponse = decode_json(&body)?;

    if let Some(err) = response.error {
        return Err(ApiError::Reported(err));
    }

    Ok(response.results)
}

/// Fetch the most frequent words, across all posts or for one category
pub async fn fetch_top_words(
    source: &dyn AnalyticsSource,
    category: Option<DisasterCategory>,
    query: &QueryString,
) -> ApiResult<Vec<WordCount>> {
    let body = source
        .get_text(Endpoint::MostFrequentWord, &category_param(category), query)
        .await?;

    if let Ok(Value::Object(map)) = decode_json::<Value>(&body) {
        if let Some(err) = map.get("error") {
            return Err(ApiError::Reported(value_text(err)));
        }
    }

    let payload: WordsPayload = decode_json(&body)?;
    Ok(payload.into_words())
}

/// Fetch daily post counts for one category.
///
/// Records that do not decode are skipped individually.
pub async fn fetch_post_counts(
    source: &dyn AnalyticsSource,
    category: DisasterCategory,
    query: &QueryString,
) -> ApiResult<Vec<PostCount>> {
    let body = source
        .get_text(Endpoint::PostsOverTime, &category_param(Some(category)), query)
        .await?;

    let counts = decode_array(&body)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<PostCount>(item) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(%category, index, "Skipping malformed post count: {}", e);
                None
            }
        })
        .collect();

    Ok(counts)
}

/// Fetch the most mentioned disaster and location
pub async fn fetch_top_disaster(
    source: &dyn AnalyticsSource,
    query: &QueryString,
) -> ApiResult<TopDisaster> {
    let body = source.get_text(Endpoint::TopDisasterLastDay, &[], query).await?;

    let value: Value = decode_json(&body)?;
    if let Some(err) = value.get("error") {
        return Err(ApiError::Reported(value_text(err)));
    }

    Ok(serde_json::from_value(value)?)
}

/// Fetch recent post texts for one category
pub async fn fetch_feed(
    source: &dyn AnalyticsSource,
    category: DisasterCategory,
    query: &QueryString,
) -> ApiResult<Vec<FeedPost>> {
    let body = source
        .get_text(Endpoint::TextFromLabel, &category_param(Some(category)), query)
        .await?;

    let posts = decode_array(&body)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<FeedPost>(item) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!(%category, index, "Skipping malformed post: {}", e);
                None
            }
        })
        .collect();

    Ok(posts)
}
