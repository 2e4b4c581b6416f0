//! Color theme handed to every render adapter

use serde::{Deserialize, Serialize};

/// Dashboard palette.
///
/// Injected through configuration rather than read from the page, so the
/// same adapters serve every presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    #[serde(default = "default_red")]
    pub red: String,
    #[serde(default = "default_orange")]
    pub orange: String,
    #[serde(default = "default_yellow")]
    pub yellow: String,
    #[serde(default = "default_green")]
    pub green: String,
    #[serde(default = "default_purple")]
    pub purple: String,
    /// Text color for legends
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

fn default_red() -> String {
    "#ff5555".to_string()
}

fn default_orange() -> String {
    "#ffb86c".to_string()
}

fn default_yellow() -> String {
    "#f1fa8c".to_string()
}

fn default_green() -> String {
    "#50fa7b".to_string()
}

fn default_purple() -> String {
    "#bd93f9".to_string()
}

fn default_foreground() -> String {
    "#f8f8f2".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            red: default_red(),
            orange: default_orange(),
            yellow: default_yellow(),
            green: default_green(),
            purple: default_purple(),
            foreground: default_foreground(),
        }
    }
}

impl Theme {
    /// Series colors, hottest first
    pub fn palette(&self) -> [&str; 5] {
        [
            self.red.as_str(),
            self.orange.as_str(),
            self.yellow.as_str(),
            self.green.as_str(),
            self.purple.as_str(),
        ]
    }

    /// Palette color for the n-th series, cycling
    pub fn series_color(&self, index: usize) -> &str {
        let palette = self.palette();
        palette[index % palette.len()]
    }
}
