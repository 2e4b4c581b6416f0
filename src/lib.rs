//! # Disasterwatch
//!
//! Disaster Analytics Dashboard Core - polls a disaster social-media analytics
//! API and turns its responses into chart, map and card data.
//!
//! ## Features
//!
//! - **Time filters**: hour/day/week/month/year/custom ranges resolved to a query string
//! - **Per-category fan-out**: concurrent fetches merged onto one label axis
//! - **Validated geodata**: invalid coordinates dropped before rendering
//! - **Cancellable refresh**: one timer per widget, replaced when inputs change
//! - **Render adapters**: pure mappings to pie, line, heat map and word cloud data
//!
//! ## Modules
//!
//! - [`range`]: Time range resolution
//! - [`api`]: Analytics API client and response types
//! - [`fetch`]: Coordinate fetching and series aggregation
//! - [`refresh`]: Periodic refresh loops
//! - [`render`]: Render adapters
//! - [`dashboard`]: The mounted widget set
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use disasterwatch::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client: Arc<dyn AnalyticsSource> =
//!         Arc::new(ApiClient::new(ApiClientConfig::default())?);
//!
//!     // Posts per day for the past week, aligned across categories
//!     let range = resolve_now("week", None);
//!     let aggregator = SeriesAggregator::new(
//!         client.clone(),
//!         &[DisasterCategory::Flood, DisasterCategory::Wildfire],
//!     );
//!     let aligned = aggregator.aggregate(&range.query).await;
//!
//!     let chart = line_chart(&aligned, &Theme::default());
//!     println!("{} days, {} series", chart.labels.len(), chart.datasets.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod range;
pub mod refresh;
pub mod render;

// Re-export top-level types for convenience
pub use range::{resolve, resolve_now, Clock, QueryString, RangeSelection, ResolvedRange, TimeFilter, TimeRange};

pub use api::{
    AnalyticsSource, ApiClient, ApiClientConfig, ApiError, ApiResult, DisasterCategory, Endpoint, FeedPost,
    LabelCount, PostCount, SeriesLabel, TopDisaster, WordCount,
};

pub use fetch::{align_series, AlignedSeries, Coordinate, CoordinateFetcher, SeriesAggregator};

pub use refresh::{RefreshController, RefreshHandle, RefreshToken, Subscription};

pub use render::{
    assess_danger, heat_layer, line_chart, pie_chart, word_cloud, DangerAssessment, DangerLevel, HeatLayer,
    LineChart, PieChart, Theme, WordToken,
};

pub use dashboard::{Dashboard, DashboardSnapshot, DashboardViews, WidgetState};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};
