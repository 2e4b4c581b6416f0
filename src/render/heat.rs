//! Coordinates → heat map layer

use super::theme::Theme;
use crate::fetch::Coordinate;
use serde::{Deserialize, Serialize};

/// Map a sentiment score in [-1, 1] to a heat intensity in [0, 1].
///
/// Uses `(v + 1) / 2`, clamped; non-finite input maps to neutral (0.5).
pub fn normalize_sentiment(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.5;
    }
    ((value + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

impl HeatPoint {
    /// `[lat, lng, intensity]`, the form heat layer libraries take
    pub fn to_array(&self) -> [f64; 3] {
        [self.lat, self.lng, self.intensity]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradientStop {
    pub stop: f64,
    pub color: String,
}

/// Data and options for a heat layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub gradient: Vec<GradientStop>,
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
}

/// Five-stop gradient from purple (0.0) through yellow to red (1.0)
pub fn heat_gradient(theme: &Theme) -> Vec<GradientStop> {
    [
        (0.0, &theme.purple),
        (0.25, &theme.green),
        (0.5, &theme.yellow),
        (0.75, &theme.orange),
        (1.0, &theme.red),
    ]
    .into_iter()
    .map(|(stop, color)| GradientStop {
        stop,
        color: color.clone(),
    })
    .collect()
}

pub fn heat_layer(coordinates: &[Coordinate], theme: &Theme) -> HeatLayer {
    HeatLayer {
        points: coordinates
            .iter()
            .map(|c| HeatPoint {
                lat: c.lat,
                lng: c.lng,
                intensity: normalize_sentiment(c.sentiment),
            })
            .collect(),
        gradient: heat_gradient(theme),
        radius: 20,
        blur: 5,
        max_zoom: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sentiment() {
        assert_eq!(normalize_sentiment(-1.0), 0.0);
        assert_eq!(normalize_sentiment(1.0), 1.0);
        assert_eq!(normalize_sentiment(0.0), 0.5);
        assert_eq!(normalize_sentiment(-0.5), 0.25);
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        assert_eq!(normalize_sentiment(3.0), 1.0);
        assert_eq!(normalize_sentiment(-2.0), 0.0);
        assert_eq!(normalize_sentiment(f64::NAN), 0.5);
    }

    #[test]
    fn test_heat_layer_points() {
        let layer = heat_layer(
            &[Coordinate { lat: 29.9, lng: -90.1, sentiment: 0.5 }],
            &Theme::default(),
        );

        assert_eq!(layer.points[0].to_array(), [29.9, -90.1, 0.75]);
        assert_eq!(layer.gradient.len(), 5);
        assert_eq!(layer.gradient[0].color, "#bd93f9");
        assert_eq!(layer.gradient[4].color, "#ff5555");
    }
}
