//! Post volume → danger level card

use super::theme::Theme;
use crate::api::DisasterCategory;
use serde::{Deserialize, Serialize};

/// Display-only severity derived from post volume
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DangerLevel {
    None,
    Low,
    Medium,
    High,
}

impl DangerLevel {
    /// Level for the busiest category's post count in the window
    pub fn from_count(count: u64) -> Self {
        match count {
            c if c > 5000 => DangerLevel::High,
            c if c > 3000 => DangerLevel::Medium,
            c if c > 1000 => DangerLevel::Low,
            _ => DangerLevel::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DangerLevel::None => "None",
            DangerLevel::Low => "Low",
            DangerLevel::Medium => "Medium",
            DangerLevel::High => "High",
        }
    }

    pub fn color<'a>(&self, theme: &'a Theme) -> &'a str {
        match self {
            DangerLevel::None => theme.green.as_str(),
            DangerLevel::Low => theme.yellow.as_str(),
            DangerLevel::Medium => theme.orange.as_str(),
            DangerLevel::High => theme.red.as_str(),
        }
    }
}

impl std::fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DangerAssessment {
    pub level: DangerLevel,
    /// Busiest category, if any category had posts
    pub category: Option<DisasterCategory>,
    pub post_count: u64,
    pub color: String,
}

/// Pick the busiest category and grade it; ties keep the earlier category
pub fn assess_danger(totals: &[(DisasterCategory, u64)], theme: &Theme) -> DangerAssessment {
    let mut busiest: Option<(DisasterCategory, u64)> = None;
    for &(category, count) in totals {
        if count > busiest.map(|(_, c)| c).unwrap_or(0) {
            busiest = Some((category, count));
        }
    }

    let post_count = busiest.map(|(_, c)| c).unwrap_or(0);
    let level = DangerLevel::from_count(post_count);

    DangerAssessment {
        level,
        category: busiest.map(|(c, _)| c),
        post_count,
        color: level.color(theme).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(DangerLevel::from_count(0), DangerLevel::None);
        assert_eq!(DangerLevel::from_count(1000), DangerLevel::None);
        assert_eq!(DangerLevel::from_count(1001), DangerLevel::Low);
        assert_eq!(DangerLevel::from_count(3001), DangerLevel::Medium);
        assert_eq!(DangerLevel::from_count(5001), DangerLevel::High);
    }

    #[test]
    fn test_assess_picks_busiest() {
        let theme = Theme::default();
        let assessment = assess_danger(
            &[
                (DisasterCategory::Flood, 1200),
                (DisasterCategory::Wildfire, 3500),
                (DisasterCategory::Tornado, 3500),
            ],
            &theme,
        );

        assert_eq!(assessment.level, DangerLevel::Medium);
        assert_eq!(assessment.category, Some(DisasterCategory::Wildfire));
        assert_eq!(assessment.color, theme.orange);
    }

    #[test]
    fn test_assess_quiet_day() {
        let assessment = assess_danger(&[(DisasterCategory::Flood, 0)], &Theme::default());

        assert_eq!(assessment.level, DangerLevel::None);
        assert_eq!(assessment.category, None);
        assert_eq!(assessment.color, "#50fa7b");
    }
}
