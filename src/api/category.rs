//! Disaster categories reported by the analytics API

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Disaster type used as the `disaster_type` filter on every endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DisasterCategory {
    Hurricane,
    Flood,
    Wildfire,
    Tornado,
    Earthquake,
    Blizzard,
    /// Posts the classifier could not place; hidden from distribution charts
    Other,
}

impl DisasterCategory {
    /// Get all categories for iteration
    pub fn all() -> &'static [DisasterCategory] {
        &[
            DisasterCategory::Hurricane,
            DisasterCategory::Flood,
            DisasterCategory::Wildfire,
            DisasterCategory::Tornado,
            DisasterCategory::Earthquake,
            DisasterCategory::Blizzard,
            DisasterCategory::Other,
        ]
    }

    /// The category token as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterCategory::Hurricane => "hurricane",
            DisasterCategory::Flood => "flood",
            DisasterCategory::Wildfire => "wildfire",
            DisasterCategory::Tornado => "tornado",
            DisasterCategory::Earthquake => "earthquake",
            DisasterCategory::Blizzard => "blizzard",
            DisasterCategory::Other => "other",
        }
    }

    /// Capitalized name for chart legends
    pub fn title(&self) -> String {
        let token = self.as_str();
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for DisasterCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tokens outside the known category set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown disaster category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for DisasterCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        DisasterCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == token)
            .ok_or(UnknownCategory(s.to_string()))
    }
}
