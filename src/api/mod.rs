//! Analytics API Access
//!
//! Client side of the disaster analytics REST API.
//!
//! ## Endpoints
//!
//! - GET /fetch-label-count - Share of posts per disaster label
//! - GET /fetch-most-frequent-word/ - Top keywords
//! - GET /fetch-posts-over-time/ - Daily post counts per category
//! - GET /fetch-coordinates-by-label - Geocoded posts with sentiment
//! - GET /fetch-top-disaster-last-day - Most mentioned disaster and location
//! - GET /fetch-text-from-label - Recent post texts
//!
//! All endpoints accept the optional `start_date`/`end_date` query produced by
//! [`crate::range`] and a `disaster_type` filter.

mod category;
mod client;
mod dto;
mod endpoints;
mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use category::{DisasterCategory, UnknownCategory};
pub use client::{AnalyticsSource, ApiClient, ApiClientConfig, Endpoint};
pub use dto::{FeedPost, LabelCount, LabelCountResponse, PostCount, SeriesLabel, TopDisaster, WordCount};
pub use endpoints::{
    decode_array, decode_json, fetch_feed, fetch_label_counts, fetch_post_counts, fetch_top_disaster,
    fetch_top_words,
};
pub use error::{ApiError, ApiResult};
