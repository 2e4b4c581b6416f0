//! Aligned series → line chart

use super::theme::Theme;
use crate::fetch::AlignedSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineDataset {
    /// Legend label, e.g. "Hurricane"
    pub label: String,
    pub data: Vec<u64>,
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
}

pub fn line_chart(aligned: &AlignedSeries, theme: &Theme) -> LineChart {
    LineChart {
        labels: aligned.labels.iter().map(|l| l.to_string()).collect(),
        datasets: aligned
            .series
            .iter()
            .enumerate()
            .map(|(index, s)| LineDataset {
                label: s.category.title(),
                data: s.counts.clone(),
                color: theme.series_color(index).to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DisasterCategory, PostCount};
    use crate::fetch::align_series;

    #[test]
    fn test_line_chart_from_aligned() {
        let aligned = align_series(vec![
            (DisasterCategory::Hurricane, Some(vec![PostCount::new("2025-04-01", 5)])),
            (DisasterCategory::Flood, Some(vec![PostCount::new("2025-04-02", 3)])),
        ]);

        let chart = line_chart(&aligned, &Theme::default());

        assert_eq!(chart.labels, vec!["2025-04-01", "2025-04-02"]);
        assert_eq!(chart.datasets[0].label, "Hurricane");
        assert_eq!(chart.datasets[0].data, vec![5, 0]);
        assert_eq!(chart.datasets[1].label, "Flood");
        assert_eq!(chart.datasets[1].color, "#ffb86c");
    }
}
