//! Disasterwatch CLI
//!
//! One-shot queries against the disaster analytics API:
//! - Resolve time filters
//! - Fetch label shares, keywords, post series, coordinates and feeds
//! - Grade the current danger level
//! - Watch the dashboard live

use anyhow::Context;
use clap::{Parser, Subcommand};
use disasterwatch::api::{fetch_feed, fetch_label_counts, fetch_top_disaster, fetch_top_words};
use disasterwatch::fetch::fetch_coordinates;
use disasterwatch::render::normalize_sentiment;
use disasterwatch::{
    assess_danger, resolve_now, word_cloud, AnalyticsSource, ApiClient, ApiClientConfig, Config, Dashboard,
    DisasterCategory, ResolvedRange, SeriesAggregator, Theme,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "disasterwatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the disaster analytics API")]
#[command(long_about = "Disasterwatch queries a disaster social-media analytics API.\nInspect label shares, keywords, post volume and geodata for any time range.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Analytics API URL
    #[arg(long, default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Time filter: hour, day, week, month, year, all
    #[arg(long, default_value = "week", global = true)]
    pub filter: String,

    /// Custom range start (RFC 3339 or YYYY-MM-DD); needs --end
    #[arg(long, global = true)]
    pub start: Option<String>,

    /// Custom range end (RFC 3339 or YYYY-MM-DD); needs --start
    #[arg(long, global = true)]
    pub end: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved time range and query string
    Range,

    /// Share of posts per disaster label
    Labels,

    /// Most frequent keywords
    Words {
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<DisasterCategory>,
    },

    /// Posts per day, aligned across categories
    Series {
        /// Categories (default: hurricane, flood, wildfire, tornado, earthquake)
        categories: Vec<DisasterCategory>,
    },

    /// Valid geocoded posts for a category
    Coords {
        category: DisasterCategory,
    },

    /// Most mentioned disaster and location in the past day
    Top,

    /// Danger level from the past day's post volume
    Danger {
        /// Categories (default: hurricane, flood, wildfire, tornado, earthquake)
        categories: Vec<DisasterCategory>,
    },

    /// Recent posts for a category
    Feed {
        category: DisasterCategory,
        /// Maximum posts shown
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Mount the dashboard and print snapshots as widgets refresh
    Watch {
        /// Category for the heat map, keyword cloud and feed
        #[arg(short, long, default_value = "earthquake")]
        category: DisasterCategory,
        /// Refresh interval in seconds
        #[arg(short, long, default_value = "60")]
        interval: u64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn range(&self) -> ResolvedRange {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => resolve_now("custom", Some((start.as_str(), end.as_str()))),
            _ => resolve_now(&self.filter, None),
        }
    }

    fn json(&self) -> bool {
        self.format == "json"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics (dropped records, fallbacks) go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disasterwatch=warn".into()),
        )
        .init();

    if (cli.start.is_some()) != (cli.end.is_some()) {
        anyhow::bail!("--start and --end must be given together");
    }

    let range = cli.range();
    let source: Arc<dyn AnalyticsSource> = Arc::new(ApiClient::new(ApiClientConfig {
        base_url: cli.api_url.clone(),
        ..ApiClientConfig::default()
    })?);
    let theme = Theme::default();

    match &cli.command {
        Commands::Range => {
            if cli.json() {
                print_json(&range)?;
            } else {
                println!("Label: {}", display_or_dash(&range.label));
                if let Some(r) = range.range {
                    println!("Start: {}", r.start.to_rfc3339());
                    println!("End:   {}", r.end.to_rfc3339());
                }
                println!("Query: {}", display_or_dash(range.query.as_str()));
            }
        }

        Commands::Labels => {
            let counts = fetch_label_counts(source.as_ref(), &range.query).await?;

            if cli.json() {
                print_json(&counts)?;
            } else if counts.is_empty() {
                println!("No posts {}", range.label);
            } else {
                println!("{:<14} {:>10} {:>8}", "Label", "Posts", "Share");
                println!("{}", "-".repeat(34));
                for c in &counts {
                    println!("{:<14} {:>10} {:>7.1}%", c.label, c.count, c.percentage);
                }
            }
        }

        Commands::Words { category } => {
            let words = fetch_top_words(source.as_ref(), *category, &range.query).await?;
            let tokens = word_cloud(&words);

            if cli.json() {
                print_json(&tokens)?;
            } else {
                println!("{:<20} {:>8} {:>6}", "Keyword", "Count", "Size");
                println!("{}", "-".repeat(36));
                for t in &tokens {
                    println!("{:<20} {:>8} {:>6.1}", t.text, t.value, t.font_size);
                }
            }
        }

        Commands::Series { categories } => {
            let categories = categories_or_default(categories);
            let aligned = SeriesAggregator::new(source.clone(), &categories)
                .aggregate(&range.query)
                .await;

            if cli.json() {
                print_json(&aligned)?;
            } else {
                print!("{:<12}", "Date");
                for s in &aligned.series {
                    print!(" | {:>10}", s.category.title());
                }
                println!();
                println!("{}", "-".repeat(12 + aligned.series.len() * 13));

                for (i, label) in aligned.labels.iter().enumerate() {
                    print!("{:<12}", label.to_string());
                    for s in &aligned.series {
                        print!(" | {:>10}", s.counts[i]);
                    }
                    println!();
                }

                if !aligned.failed.is_empty() {
                    eprintln!();
                    eprintln!("Failed categories (shown as zero): {:?}", aligned.failed);
                }
            }
        }

        Commands::Coords { category } => {
            let coordinates = fetch_coordinates(source.as_ref(), *category, &range.query)
                .await
                .with_context(|| format!("fetching {} coordinates", category))?;

            if cli.json() {
                print_json(&coordinates)?;
            } else {
                println!("{:>10} {:>11} {:>10} {:>10}", "Lat", "Lng", "Sentiment", "Intensity");
                println!("{}", "-".repeat(44));
                for c in &coordinates {
                    println!(
                        "{:>10.4} {:>11.4} {:>10.2} {:>10.2}",
                        c.lat,
                        c.lng,
                        c.sentiment,
                        normalize_sentiment(c.sentiment)
                    );
                }
                println!();
                println!("{} valid coordinates", coordinates.len());
            }
        }

        Commands::Top => {
            let top = fetch_top_disaster(source.as_ref(), &range.query).await?;

            if cli.json() {
                print_json(&top)?;
            } else if let Some(label) = &top.top_label {
                println!("Top disaster:  {}", label);
                println!("Top location:  {}", top.top_location.as_deref().unwrap_or("-"));
            } else {
                println!("{}", top.message.as_deref().unwrap_or("No data"));
            }
        }

        Commands::Danger { categories } => {
            let categories = categories_or_default(categories);
            let day = resolve_now("day", None);
            let aligned = SeriesAggregator::new(source.clone(), &categories)
                .aggregate(&day.query)
                .await;
            if aligned.all_failed() {
                anyhow::bail!("no category could be fetched");
            }
            let assessment = assess_danger(&aligned.totals(), &theme);

            if cli.json() {
                print_json(&assessment)?;
            } else {
                println!("Danger level: {}", assessment.level);
                match assessment.category {
                    Some(c) => println!("Busiest:      {} ({} posts)", c.title(), assessment.post_count),
                    None => println!("Busiest:      -"),
                }
            }
        }

        Commands::Feed { category, limit } => {
            let mut posts = fetch_feed(source.as_ref(), *category, &range.query).await?;
            posts.truncate(*limit);

            if cli.json() {
                print_json(&posts)?;
            } else if posts.is_empty() {
                println!("No posts for {}", category);
            } else {
                for post in &posts {
                    let author = post.author.as_deref().unwrap_or("Unknown");
                    match &post.handle {
                        Some(handle) => println!("{} (@{})", author, handle),
                        None => println!("{}", author),
                    }
                    println!("  {}", post.text);
                    if let Some(ts) = &post.timestamp {
                        println!("  {}", ts);
                    }
                    println!();
                }
            }
        }

        Commands::Watch { category, interval } => {
            let config = watch_config(Config::load_default(), *category, *interval, &cli.filter);

            let mut dashboard = Dashboard::mount(&config, source.clone());
            if let (Some(start), Some(end)) = (&cli.start, &cli.end) {
                dashboard.set_filter("custom", Some((start.as_str(), end.as_str())));
            }
            let mut views = dashboard.views();

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = views.danger.changed() => changed?,
                    changed = views.posts_over_time.changed() => changed?,
                    changed = views.heat_map.changed() => changed?,
                    changed = views.label_distribution.changed() => changed?,
                }

                let snapshot = dashboard.snapshot();
                if cli.json() {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    let level = snapshot
                        .danger
                        .data
                        .as_ref()
                        .map(|d| d.level.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let points = snapshot.heat_map.data.as_ref().map(|h| h.points.len()).unwrap_or(0);
                    let days = snapshot
                        .posts_over_time
                        .data
                        .as_ref()
                        .map(|c| c.labels.len())
                        .unwrap_or(0);
                    println!(
                        "[{}] {} | danger {} | {} days charted | {} {} points",
                        chrono::Utc::now().format("%H:%M:%S"),
                        snapshot.range_label,
                        level,
                        days,
                        snapshot.category,
                        points
                    );
                }
            }

            dashboard.unmount();
        }

        Commands::Config { output } => {
            let config = disasterwatch::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Layer the `watch` flags over the loaded config
fn watch_config(mut config: Config, category: DisasterCategory, interval: u64, filter: &str) -> Config {
    config.refresh.interval_secs = interval.max(1);
    config.dashboard.default_category = category;
    config.dashboard.default_filter = filter.to_string();
    config
}

fn categories_or_default(categories: &[DisasterCategory]) -> Vec<DisasterCategory> {
    if categories.is_empty() {
        Config::default().dashboard.categories
    } else {
        categories.to_vec()
    }
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_keeps_config_file_settings() {
        let mut loaded = Config::default();
        loaded.dashboard.categories = vec![DisasterCategory::Flood, DisasterCategory::Blizzard];
        loaded.dashboard.feed_limit = 5;
        loaded.theme.red = "#cc0000".to_string();

        let config = watch_config(loaded, DisasterCategory::Tornado, 0, "day");

        assert_eq!(
            config.dashboard.categories,
            vec![DisasterCategory::Flood, DisasterCategory::Blizzard]
        );
        assert_eq!(config.dashboard.feed_limit, 5);
        assert_eq!(config.theme.red, "#cc0000");
        assert_eq!(config.dashboard.default_category, DisasterCategory::Tornado);
        assert_eq!(config.dashboard.default_filter, "day");
        assert_eq!(config.refresh.interval_secs, 1);
    }
}
