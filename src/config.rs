//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. The
//! resulting [`Config`] is passed explicitly to the client, the refresh
//! loops and the render adapters.

use crate::api::{ApiClientConfig, DisasterCategory};
use crate::render::Theme;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analytics API
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.host.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Refresh interval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Interval for chart and card widgets
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Interval for heat map coordinate polling
    #[serde(default = "default_coordinate_interval")]
    pub coordinate_interval_secs: u64,
}

fn default_interval() -> u64 {
    60
}

fn default_coordinate_interval() -> u64 {
    10
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            coordinate_interval_secs: default_coordinate_interval(),
        }
    }
}

impl RefreshConfig {
    pub fn widget_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn coordinate_interval(&self) -> Duration {
        Duration::from_secs(self.coordinate_interval_secs)
    }
}

/// Dashboard widget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Categories charted side by side
    #[serde(default = "default_categories")]
    pub categories: Vec<DisasterCategory>,

    /// Filter token applied at startup
    #[serde(default = "default_filter")]
    pub default_filter: String,

    /// Category for the heat map, keyword cloud and feed at startup
    #[serde(default = "default_category")]
    pub default_category: DisasterCategory,

    /// Maximum posts kept by the feed widget
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
}

fn default_categories() -> Vec<DisasterCategory> {
    vec![
        DisasterCategory::Hurricane,
        DisasterCategory::Flood,
        DisasterCategory::Wildfire,
        DisasterCategory::Tornado,
        DisasterCategory::Earthquake,
    ]
}

fn default_filter() -> String {
    "week".to_string()
}

fn default_category() -> DisasterCategory {
    DisasterCategory::Earthquake
}

fn default_feed_limit() -> usize {
    20
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_filter: default_filter(),
            default_category: default_category(),
            feed_limit: default_feed_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("disasterwatch").join("config.toml")),
            Some(PathBuf::from("/etc/disasterwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Reject values the refresh loops and widgets cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 || self.refresh.coordinate_interval_secs == 0 {
            return Err(ConfigError::Invalid("refresh intervals must be at least 1 second".into()));
        }
        if self.dashboard.categories.is_empty() {
            return Err(ConfigError::Invalid("dashboard.categories must not be empty".into()));
        }
        if self.api.host.trim().is_empty() {
            return Err(ConfigError::Invalid("api.host must not be empty".into()));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Values that would fail validation are
    /// logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("DISASTERWATCH_API_HOST") {
            if host.trim().is_empty() {
                tracing::warn!("Ignoring empty DISASTERWATCH_API_HOST");
            } else {
                self.api.host = host;
            }
        }
        if let Some(secs) = lookup("DISASTERWATCH_REFRESH_SECS") {
            match secs.parse() {
                Ok(s) if s > 0 => self.refresh.interval_secs = s,
                _ => tracing::warn!("Ignoring invalid DISASTERWATCH_REFRESH_SECS={:?}", secs),
            }
        }

        if let Some(level) = lookup("DISASTERWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DISASTERWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Disasterwatch Configuration
#
# Environment variables override these settings:
# - DISASTERWATCH_API_HOST
# - DISASTERWATCH_REFRESH_SECS
# - DISASTERWATCH_LOG_LEVEL
# - DISASTERWATCH_LOG_FORMAT

[api]
# Base URL of the analytics API
host = "http://localhost:5000"

# Request timeout in seconds
request_timeout_secs = 10

[refresh]
# How often chart and card widgets refresh (seconds)
interval_secs = 60

# How often heat map coordinates refresh (seconds)
coordinate_interval_secs = 10

[dashboard]
# Categories charted side by side
categories = ["hurricane", "flood", "wildfire", "tornado", "earthquake"]

# Time filter at startup: hour, day, week, month, year, all
default_filter = "week"

# Category for the heat map, keyword cloud and feed
default_category = "earthquake"

# Maximum posts shown in the feed
feed_limit = 20

[theme]
red = "#ff5555"
orange = "#ffb86c"
yellow = "#f1fa8c"
green = "#50fa7b"
purple = "#bd93f9"
foreground = "#f8f8f2"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}
