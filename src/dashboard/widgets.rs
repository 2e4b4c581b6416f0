//! Dashboard Widgets
//!
//! One type per card on the dashboard. Each loads its data through the
//! analytics source and runs it through a render adapter.

use super::state::LoadRequest;
use crate::api::{
    fetch_feed, fetch_label_counts, fetch_top_disaster, fetch_top_words, AnalyticsSource, ApiError,
    ApiResult, DisasterCategory, FeedPost, TopDisaster,
};
use crate::fetch::{CoordinateFetcher, SeriesAggregator};
use crate::range::{resolve, QueryString};
use crate::render::{
    assess_danger, heat_layer, line_chart, pie_chart, word_cloud, DangerAssessment, HeatLayer, LineChart,
    PieChart, Theme, WordToken,
};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Common trait for all dashboard widgets
#[async_trait]
pub trait Widget: Send + Sync + 'static {
    type Output: Clone + Debug + Send + Sync + 'static;

    /// Name used for logging and the refresh subscription
    fn name(&self) -> &'static str;

    /// Whether the widget follows the selected category
    fn follows_category(&self) -> bool {
        false
    }

    /// Whether the widget follows the dashboard's time range
    fn follows_range(&self) -> bool {
        true
    }

    /// Load one refresh cycle's worth of data
    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output>;
}

fn require_category(widget: &str, request: &LoadRequest) -> ApiResult<DisasterCategory> {
    request
        .category
        .ok_or_else(|| ApiError::UnexpectedShape(format!("{} needs a category", widget)))
}

/// "Which Natural Disasters Dominate?" pie chart
pub struct LabelDistribution {
    pub source: Arc<dyn AnalyticsSource>,
    pub theme: Arc<Theme>,
}

#[async_trait]
impl Widget for LabelDistribution {
    /// `None` when only the hidden `other` label had posts
    type Output = Option<PieChart>;

    fn name(&self) -> &'static str {
        "label-distribution"
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let counts = fetch_label_counts(self.source.as_ref(), &request.query).await?;
        Ok(pie_chart(&counts, &self.theme))
    }
}

/// Keyword cloud for the selected category
pub struct KeywordCloud {
    pub source: Arc<dyn AnalyticsSource>,
}

#[async_trait]
impl Widget for KeywordCloud {
    type Output = Vec<WordToken>;

    fn name(&self) -> &'static str {
        "keyword-cloud"
    }

    fn follows_category(&self) -> bool {
        true
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let words = fetch_top_words(self.source.as_ref(), request.category, &request.query).await?;
        Ok(word_cloud(&words))
    }
}

/// Posts per day for every configured category
pub struct PostsOverTime {
    pub aggregator: SeriesAggregator,
    pub theme: Arc<Theme>,
}

#[async_trait]
impl Widget for PostsOverTime {
    type Output = LineChart;

    fn name(&self) -> &'static str {
        "posts-over-time"
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let aligned = self.aggregator.aggregate(&request.query).await;
        if aligned.all_failed() {
            return Err(ApiError::Reported("no category could be fetched".into()));
        }
        Ok(line_chart(&aligned, &self.theme))
    }
}

/// Sentiment heat map for the selected category
pub struct HeatMap {
    pub fetcher: Mutex<CoordinateFetcher>,
    pub theme: Arc<Theme>,
}

impl HeatMap {
    pub fn new(source: Arc<dyn AnalyticsSource>, category: DisasterCategory, theme: Arc<Theme>) -> Self {
        Self {
            fetcher: Mutex::new(CoordinateFetcher::new(source, category)),
            theme,
        }
    }
}

#[async_trait]
impl Widget for HeatMap {
    type Output = HeatLayer;

    fn name(&self) -> &'static str {
        "heat-map"
    }

    fn follows_category(&self) -> bool {
        true
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let category = require_category(self.name(), request)?;
        let mut fetcher = self.fetcher.lock().await;
        fetcher.set_category(category);
        fetcher.refresh(&request.query).await?;

        let coordinates = fetcher.to_vec();
        Ok(heat_layer(&coordinates, &self.theme))
    }
}

/// Most mentioned disaster and location
pub struct TopDisasterCard {
    pub source: Arc<dyn AnalyticsSource>,
}

#[async_trait]
impl Widget for TopDisasterCard {
    type Output = TopDisaster;

    fn name(&self) -> &'static str {
        "top-disaster"
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        fetch_top_disaster(self.source.as_ref(), &request.query).await
    }
}

/// Danger level from the busiest category of the past day.
///
/// Always looks at the past day, whatever range the dashboard shows.
pub struct DangerLevelCard {
    pub aggregator: SeriesAggregator,
    pub theme: Arc<Theme>,
}

impl DangerLevelCard {
    fn window_query(now: chrono::DateTime<chrono::Utc>) -> QueryString {
        resolve("day", None, now).query
    }
}

#[async_trait]
impl Widget for DangerLevelCard {
    type Output = DangerAssessment;

    fn name(&self) -> &'static str {
        "danger-level"
    }

    fn follows_range(&self) -> bool {
        false
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let aligned = self.aggregator.aggregate(&Self::window_query(request.now)).await;
        if aligned.all_failed() {
            return Err(ApiError::Reported("no category could be fetched".into()));
        }
        Ok(assess_danger(&aligned.totals(), &self.theme))
    }
}

/// Recent posts for the selected category
pub struct Feed {
    pub source: Arc<dyn AnalyticsSource>,
    pub limit: usize,
}

#[async_trait]
impl Widget for Feed {
    type Output = Vec<FeedPost>;

    fn name(&self) -> &'static str {
        "feed"
    }

    fn follows_category(&self) -> bool {
        true
    }

    async fn load(&self, request: &LoadRequest) -> ApiResult<Self::Output> {
        let category = require_category(self.name(), request)?;
        let mut posts = fetch_feed(self.source.as_ref(), category, &request.query).await?;
        posts.truncate(self.limit);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StaticSource;
    use crate::api::Endpoint;
    use crate::render::DangerLevel;

    fn request(category: Option<DisasterCategory>) -> LoadRequest {
        LoadRequest {
            query: QueryString::empty(),
            category,
            now: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_label_distribution() {
        let source = Arc::new(StaticSource::new().body(
            Endpoint::LabelCount,
            None,
            r#"{"results": [{"label": "other", "percentage": 70.0}, {"label": "flood", "percentage": 30.0}]}"#,
        ));
        let widget = LabelDistribution {
            source,
            theme: Arc::new(Theme::default()),
        };

        let chart = widget.load(&request(None)).await.unwrap().unwrap();
        assert_eq!(chart.labels(), vec!["flood"]);
    }

    #[tokio::test]
    async fn test_heat_map_requires_category() {
        let widget = HeatMap::new(
            Arc::new(StaticSource::new()),
            DisasterCategory::Flood,
            Arc::new(Theme::default()),
        );

        assert!(widget.load(&request(None)).await.is_err());
    }

    #[tokio::test]
    async fn test_heat_map_switches_category() {
        let source = Arc::new(
            StaticSource::new()
                .body(
                    Endpoint::CoordinatesByLabel,
                    Some(DisasterCategory::Flood),
                    r#"[{"lat": 1.0, "lng": 2.0, "sentiment_scaled": 1.0}]"#,
                )
                .body(Endpoint::CoordinatesByLabel, Some(DisasterCategory::Wildfire), "[]"),
        );
        let widget = HeatMap::new(source, DisasterCategory::Flood, Arc::new(Theme::default()));

        let layer = widget.load(&request(Some(DisasterCategory::Flood))).await.unwrap();
        assert_eq!(layer.points.len(), 1);
        assert_eq!(layer.points[0].intensity, 1.0);

        let layer = widget.load(&request(Some(DisasterCategory::Wildfire))).await.unwrap();
        assert!(layer.points.is_empty());
    }

    #[tokio::test]
    async fn test_danger_level_uses_busiest_category() {
        let source = Arc::new(
            StaticSource::new()
                .body(
                    Endpoint::PostsOverTime,
                    Some(DisasterCategory::Flood),
                    r#"[{"timestamp": "2025-04-09", "post_count": 2000}, {"timestamp": "2025-04-10", "post_count": 1500}]"#,
                )
                .body(
                    Endpoint::PostsOverTime,
                    Some(DisasterCategory::Tornado),
                    r#"[{"timestamp": "2025-04-10", "post_count": 900}]"#,
                ),
        );
        let widget = DangerLevelCard {
            aggregator: SeriesAggregator::new(
                source.clone(),
                &[DisasterCategory::Flood, DisasterCategory::Tornado],
            ),
            theme: Arc::new(Theme::default()),
        };

        let request = request(None);
        let assessment = widget.load(&request).await.unwrap();
        assert_eq!(assessment.level, DangerLevel::Medium);
        assert_eq!(assessment.category, Some(DisasterCategory::Flood));
        assert_eq!(assessment.post_count, 3500);

        // Past day as of the cycle's clock, not the dashboard range
        let day = resolve("day", None, request.now).query;
        assert!(source.calls().iter().all(|c| c.query == day));
    }

    #[tokio::test]
    async fn test_posts_over_time_all_failed_is_error() {
        let widget = PostsOverTime {
            aggregator: SeriesAggregator::new(Arc::new(StaticSource::new()), &[DisasterCategory::Flood]),
            theme: Arc::new(Theme::default()),
        };

        assert!(matches!(widget.load(&request(None)).await, Err(ApiError::Reported(_))));
    }

    #[tokio::test]
    async fn test_feed_truncates() {
        let source = Arc::new(StaticSource::new().body(
            Endpoint::TextFromLabel,
            Some(DisasterCategory::Blizzard),
            r#"[{"text": "a"}, {"text": "b", "author": "x"}, {"text": "c"}]"#,
        ));
        let widget = Feed { source, limit: 2 };

        let posts = widget.load(&request(Some(DisasterCategory::Blizzard))).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].author.as_deref(), Some("x"));
    }
}
