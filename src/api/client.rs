//! Analytics REST API Client
//!
//! HTTP client for the disaster analytics API. Fetchers and widgets talk to
//! the API through the [`AnalyticsSource`] trait so tests can substitute
//! canned responses.

use super::error::{ApiError, ApiResult};
use crate::range::QueryString;
use async_trait::async_trait;
use reqwest::Client;

/// Endpoints of the analytics API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Share of posts per disaster label
    LabelCount,
    /// Most frequent words, optionally per category
    MostFrequentWord,
    /// Daily post counts for one category
    PostsOverTime,
    /// Geocoded posts with sentiment for one category
    CoordinatesByLabel,
    /// Most mentioned category and location in the past day
    TopDisasterLastDay,
    /// Recent post texts for one category
    TextFromLabel,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::LabelCount => "/fetch-label-count",
            Endpoint::MostFrequentWord => "/fetch-most-frequent-word/",
            Endpoint::PostsOverTime => "/fetch-posts-over-time/",
            Endpoint::CoordinatesByLabel => "/fetch-coordinates-by-label",
            Endpoint::TopDisasterLastDay => "/fetch-top-disaster-last-day",
            Endpoint::TextFromLabel => "/fetch-text-from-label",
        }
    }
}

/// Raw access to the analytics API.
///
/// Implementations return the response body text for a 2xx response and an
/// [`ApiError`] for anything else. Decoding is left to the caller because
/// some endpoints need to inspect the raw text (e.g. for `NaN` tokens).
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn get_text(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        query: &QueryString,
    ) -> ApiResult<String>;
}

/// Configuration for the analytics client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the analytics API (e.g., "https://api.disasterdata.duckdns.org")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// reqwest-backed [`AnalyticsSource`]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("disasterwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Full URL for an endpoint, without query parameters
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint.path())
    }
}

#[async_trait]
impl AnalyticsSource for ApiClient {
    async fn get_text(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        query: &QueryString,
    ) -> ApiResult<String> {
        let url = self.url(endpoint);
        tracing::debug!(url = %url, query = %query, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&query.pairs())
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(ApiError::from_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(ApiClientConfig {
            base_url: "https://api.example.org/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.url(Endpoint::PostsOverTime),
            "https://api.example.org/fetch-posts-over-time/"
        );
        assert_eq!(
            client.url(Endpoint::LabelCount),
            "https://api.example.org/fetch-label-count"
        );
    }
}
