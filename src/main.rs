//! Disasterwatch live monitor
//!
//! Mounts the dashboard against the analytics API and logs every widget
//! update until interrupted.
//!
//! Run with: cargo run --bin disasterwatch -- --filter day --category flood

use anyhow::Context;
use clap::Parser;
use disasterwatch::{ApiClient, Config, Dashboard, DashboardSnapshot, DisasterCategory, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "disasterwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live disaster analytics monitor")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time filter: hour, day, week, month, year, all
    #[arg(short, long)]
    filter: Option<String>,

    /// Category for the heat map, keyword cloud and feed
    #[arg(long)]
    category: Option<DisasterCategory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path).with_context(|| format!("loading {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(filter) = args.filter {
        config.dashboard.default_filter = filter;
    }
    if let Some(category) = args.category {
        config.dashboard.default_category = category;
    }

    init_logging(&config.logging);
    tracing::info!("Disasterwatch v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Analytics API: {}", config.api.host);

    let client = Arc::new(ApiClient::new(config.api.client_config())?);
    let dashboard = Dashboard::mount(&config, client);
    let mut views = dashboard.views();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
            changed = views.danger.changed() => {
                changed?;
                log_snapshot(&dashboard.snapshot());
            }
            changed = views.posts_over_time.changed() => {
                changed?;
                log_snapshot(&dashboard.snapshot());
            }
            changed = views.heat_map.changed() => {
                changed?;
                let heat = views.heat_map.borrow_and_update().clone();
                match heat.data {
                    Some(layer) => tracing::info!("Heat map: {} points", layer.points.len()),
                    None => tracing::info!("Heat map: no data"),
                }
            }
            changed = views.top_disaster.changed() => {
                changed?;
                let top = views.top_disaster.borrow_and_update().clone();
                if let Some(top) = top.data {
                    match (top.top_label, top.top_location, top.message) {
                        (Some(label), location, _) => tracing::info!(
                            "Top disaster: {} ({})",
                            label,
                            location.unwrap_or_else(|| "unknown location".into())
                        ),
                        (None, _, Some(message)) => tracing::info!("Top disaster: {}", message),
                        _ => {}
                    }
                }
            }
        }
    }

    dashboard.unmount();
    tracing::info!("Disasterwatch shutdown complete");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("disasterwatch={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn log_snapshot(snapshot: &DashboardSnapshot) {
    if let Some(danger) = &snapshot.danger.data {
        let category = danger
            .category
            .map(|c| c.title())
            .unwrap_or_else(|| "-".to_string());
        tracing::info!(
            "Danger level {}: {} ({} posts in the past day)",
            danger.level,
            category,
            danger.post_count
        );
    }

    if let Some(chart) = &snapshot.posts_over_time.data {
        for dataset in &chart.datasets {
            let total = dataset.data.iter().fold(0u64, |acc, &n| acc.saturating_add(n));
            tracing::info!("Posts {} - {}: {}", snapshot.range_label, dataset.label, total);
        }
    }

    for (widget, error) in [
        ("danger-level", &snapshot.danger.last_error),
        ("posts-over-time", &snapshot.posts_over_time.last_error),
    ] {
        if let Some(error) = error {
            tracing::warn!("{} is stale: {}", widget, error);
        }
    }
}
