//! Render Adapters
//!
//! Pure functions from validated API data to the data+options structures
//! chart, map and word-cloud renderers consume. No I/O, no timers.

mod danger;
mod heat;
mod line;
mod pie;
mod theme;
mod words;

pub use danger::{assess_danger, DangerAssessment, DangerLevel};
pub use heat::{heat_gradient, heat_layer, normalize_sentiment, GradientStop, HeatLayer, HeatPoint};
pub use line::{line_chart, LineChart, LineDataset};
pub use pie::{pie_chart, PieChart, PieSlice};
pub use theme::Theme;
pub use words::{word_cloud, LinearScale, WordToken, FONT_RANGE};
