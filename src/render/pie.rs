//! Label distribution → pie chart

use super::theme::Theme;
use crate::api::LabelCount;
use serde::{Deserialize, Serialize};

/// Label hidden from the distribution chart
const HIDDEN_LABEL: &str = "other";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieSlice {
    pub label: String,
    /// Share of posts, 0-100
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.slices.iter().map(|s| s.percentage).collect()
    }
}

/// Build pie slices, dropping the `other` label.
///
/// Returns `None` when nothing is left to draw.
pub fn pie_chart(counts: &[LabelCount], theme: &Theme) -> Option<PieChart> {
    let slices: Vec<PieSlice> = counts
        .iter()
        .filter(|c| !c.label.eq_ignore_ascii_case(HIDDEN_LABEL))
        .filter(|c| {
            let finite = c.percentage.is_finite();
            if !finite {
                tracing::warn!(label = %c.label, "Dropping slice with non-finite percentage");
            }
            finite
        })
        .enumerate()
        .map(|(index, c)| PieSlice {
            label: c.label.clone(),
            percentage: c.percentage,
            color: theme.series_color(index).to_string(),
        })
        .collect();

    if slices.is_empty() {
        None
    } else {
        Some(PieChart { slices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(label: &str, percentage: f64) -> LabelCount {
        LabelCount {
            label: label.to_string(),
            count: 0,
            percentage,
        }
    }

    #[test]
    fn test_other_is_hidden() {
        let chart = pie_chart(
            &[count("flood", 50.0), count("Other", 30.0), count("wildfire", 20.0)],
            &Theme::default(),
        )
        .unwrap();

        assert_eq!(chart.labels(), vec!["flood", "wildfire"]);
        assert_eq!(chart.values(), vec![50.0, 20.0]);
        assert_eq!(chart.slices[1].color, "#ffb86c");
    }

    #[test]
    fn test_only_other_yields_no_chart() {
        assert!(pie_chart(&[count("other", 100.0)], &Theme::default()).is_none());
        assert!(pie_chart(&[], &Theme::default()).is_none());
    }
}
