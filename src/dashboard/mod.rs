//! Dashboard
//!
//! Mounts the full widget set, one refresh subscription per widget, and
//! publishes each widget's [`WidgetState`] on a `tokio::sync::watch` channel.
//!
//! ```rust,no_run
//! use disasterwatch::{ApiClient, Config, Dashboard};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load_default();
//! let client = Arc::new(ApiClient::new(config.api.client_config())?);
//!
//! let mut dashboard = Dashboard::mount(&config, client);
//! let mut views = dashboard.views();
//! views.danger.changed().await?;
//! println!("{:?}", views.danger.borrow().data);
//!
//! dashboard.set_filter("month", None);
//! dashboard.unmount();
//! # Ok(())
//! # }
//! ```

mod state;
mod widgets;

pub use state::{LoadRequest, WidgetInputs, WidgetState};
pub use widgets::{
    DangerLevelCard, Feed, HeatMap, KeywordCloud, LabelDistribution, PostsOverTime, TopDisasterCard, Widget,
};

use crate::api::{AnalyticsSource, DisasterCategory, FeedPost, TopDisaster};
use crate::config::Config;
use crate::fetch::SeriesAggregator;
use crate::range::{system_clock, Clock, RangeSelection, ResolvedRange};
use crate::refresh::{ActionFactory, RefreshController, RefreshToken, Subscription};
use crate::render::{DangerAssessment, HeatLayer, LineChart, PieChart, WordToken};
use futures_util::FutureExt;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// A widget bound to its subscription, with the output type erased
trait MountedWidget: Send {
    fn retarget(&mut self, range: &RangeSelection, category: DisasterCategory) -> bool;
    fn unmount(self: Box<Self>);
}

struct Mounted<T> {
    follows_category: bool,
    follows_range: bool,
    subscription: Subscription<WidgetInputs>,
    tx: Arc<watch::Sender<WidgetState<T>>>,
}

impl<T> Mounted<T> {
    fn inputs(&self, range: &RangeSelection, category: DisasterCategory) -> WidgetInputs {
        inputs_for(self.follows_range, self.follows_category, range, category)
    }
}

fn inputs_for(
    follows_range: bool,
    follows_category: bool,
    range: &RangeSelection,
    category: DisasterCategory,
) -> WidgetInputs {
    WidgetInputs {
        range: follows_range.then(|| range.clone()),
        category: follows_category.then_some(category),
    }
}

impl<T: Send + Sync + 'static> MountedWidget for Mounted<T> {
    fn retarget(&mut self, range: &RangeSelection, category: DisasterCategory) -> bool {
        let inputs = self.inputs(range, category);
        let tx = self.tx.clone();
        // Old data must not show under new inputs
        self.subscription.update_with(inputs, move || {
            tx.send_replace(WidgetState::empty());
        })
    }

    fn unmount(self: Box<Self>) {
        self.subscription.unmount();
    }
}

fn mount_widget<W: Widget>(
    widget: W,
    controller: RefreshController,
    clock: &Clock,
    range: &RangeSelection,
    category: DisasterCategory,
) -> (Box<dyn MountedWidget>, watch::Receiver<WidgetState<W::Output>>) {
    let (tx, rx) = watch::channel(WidgetState::empty());
    let tx = Arc::new(tx);

    let name = widget.name();
    let follows_category = widget.follows_category();
    let follows_range = widget.follows_range();
    let widget = Arc::new(widget);

    let factory_tx = tx.clone();
    let clock = clock.clone();
    let factory: ActionFactory<WidgetInputs> = Arc::new(move |inputs: WidgetInputs, token: RefreshToken| {
        let widget = widget.clone();
        let tx = factory_tx.clone();
        // Named windows slide: resolve against this cycle's clock
        let request = inputs.at(clock());
        async move {
            let result = widget.load(&request).await;
            if let Err(e) = &result {
                tracing::warn!(widget = widget.name(), "Refresh failed: {}", e);
            }
            token.deliver(|| tx.send_modify(|state| state.apply(result)));
        }
        .boxed()
    });

    let inputs = inputs_for(follows_range, follows_category, range, category);
    let subscription = Subscription::mount(name, controller, inputs, factory);

    let mounted = Mounted {
        follows_category,
        follows_range,
        subscription,
        tx,
    };
    (Box::new(mounted), rx)
}

/// Receivers for every widget's state
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub label_distribution: watch::Receiver<WidgetState<Option<PieChart>>>,
    pub keywords: watch::Receiver<WidgetState<Vec<WordToken>>>,
    pub posts_over_time: watch::Receiver<WidgetState<LineChart>>,
    pub heat_map: watch::Receiver<WidgetState<HeatLayer>>,
    pub top_disaster: watch::Receiver<WidgetState<TopDisaster>>,
    pub danger: watch::Receiver<WidgetState<DangerAssessment>>,
    pub feed: watch::Receiver<WidgetState<Vec<FeedPost>>>,
}

/// Point-in-time copy of every widget's state
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub range_label: String,
    pub category: DisasterCategory,
    pub label_distribution: WidgetState<Option<PieChart>>,
    pub keywords: WidgetState<Vec<WordToken>>,
    pub posts_over_time: WidgetState<LineChart>,
    pub heat_map: WidgetState<HeatLayer>,
    pub top_disaster: WidgetState<TopDisaster>,
    pub danger: WidgetState<DangerAssessment>,
    pub feed: WidgetState<Vec<FeedPost>>,
}

/// The mounted widget set
pub struct Dashboard {
    selection: RangeSelection,
    clock: Clock,
    category: DisasterCategory,
    widgets: Vec<Box<dyn MountedWidget>>,
    views: DashboardViews,
}

impl Dashboard {
    /// Mount every widget and start refreshing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(config: &Config, source: Arc<dyn AnalyticsSource>) -> Self {
        Self::mount_with_clock(config, source, system_clock())
    }

    /// Like [`Dashboard::mount`], reading "now" from `clock` on every cycle
    pub fn mount_with_clock(config: &Config, source: Arc<dyn AnalyticsSource>, clock: Clock) -> Self {
        let selection = RangeSelection::new(&config.dashboard.default_filter, None);
        let category = config.dashboard.default_category;
        let theme = Arc::new(config.theme.clone());
        let categories = &config.dashboard.categories;

        let widget_timer = RefreshController::new(config.refresh.widget_interval());
        let coordinate_timer = RefreshController::new(config.refresh.coordinate_interval());
        let range = &selection;

        let (labels, label_distribution) = mount_widget(
            LabelDistribution {
                source: source.clone(),
                theme: theme.clone(),
            },
            widget_timer,
            &clock,
            range,
            category,
        );
        let (words, keywords) = mount_widget(
            KeywordCloud {
                source: source.clone(),
            },
            widget_timer,
            &clock,
            range,
            category,
        );
        let (series, posts_over_time) = mount_widget(
            PostsOverTime {
                aggregator: SeriesAggregator::new(source.clone(), categories),
                theme: theme.clone(),
            },
            widget_timer,
            &clock,
            range,
            category,
        );
        let (heat, heat_map) = mount_widget(
            HeatMap::new(source.clone(), category, theme.clone()),
            coordinate_timer,
            &clock,
            range,
            category,
        );
        let (top, top_disaster) = mount_widget(
            TopDisasterCard {
                source: source.clone(),
            },
            widget_timer,
            &clock,
            range,
            category,
        );
        let (level, danger) = mount_widget(
            DangerLevelCard {
                aggregator: SeriesAggregator::new(source.clone(), categories),
                theme,
            },
            widget_timer,
            &clock,
            range,
            category,
        );
        let (posts, feed) = mount_widget(
            Feed {
                source,
                limit: config.dashboard.feed_limit,
            },
            widget_timer,
            &clock,
            range,
            category,
        );

        tracing::info!(filter = %selection.token(), %category, "Dashboard mounted");

        Self {
            selection,
            clock,
            category,
            widgets: vec![labels, words, series, heat, top, level, posts],
            views: DashboardViews {
                label_distribution,
                keywords,
                posts_over_time,
                heat_map,
                top_disaster,
                danger,
                feed,
            },
        }
    }

    /// Select a time filter; every range-following widget restarts.
    ///
    /// Picking the filter already in use leaves the loops alone.
    pub fn set_filter(&mut self, token: &str, custom: Option<(&str, &str)>) -> ResolvedRange {
        self.selection = RangeSelection::new(token, custom);
        self.retarget();
        self.range()
    }

    /// Select the category for the category-scoped widgets
    pub fn set_category(&mut self, category: DisasterCategory) {
        self.category = category;
        self.retarget();
    }

    fn retarget(&mut self) {
        let restarted = self
            .widgets
            .iter_mut()
            .map(|w| w.retarget(&self.selection, self.category))
            .filter(|&changed| changed)
            .count();
        tracing::info!(filter = %self.selection.token(), category = %self.category, restarted, "Dashboard inputs changed");
    }

    /// The selected filter resolved against the clock right now
    pub fn range(&self) -> ResolvedRange {
        self.selection.resolve((self.clock)())
    }

    pub fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    pub fn category(&self) -> DisasterCategory {
        self.category
    }

    pub fn views(&self) -> DashboardViews {
        self.views.clone()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let views = &self.views;
        DashboardSnapshot {
            range_label: self.range().label,
            category: self.category,
            label_distribution: views.label_distribution.borrow().clone(),
            keywords: views.keywords.borrow().clone(),
            posts_over_time: views.posts_over_time.borrow().clone(),
            heat_map: views.heat_map.borrow().clone(),
            top_disaster: views.top_disaster.borrow().clone(),
            danger: views.danger.borrow().clone(),
            feed: views.feed.borrow().clone(),
        }
    }

    /// Cancel every refresh loop
    pub fn unmount(self) {
        for widget in self.widgets {
            widget.unmount();
        }
        tracing::info!("Dashboard unmounted");
    }
}
