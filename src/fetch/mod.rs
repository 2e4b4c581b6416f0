//! Per-category data retrieval
//!
//! - [`CoordinateFetcher`]: validated geodata for the heat map
//! - [`SeriesAggregator`]: post counts merged onto one label axis

mod coordinates;
mod series;

pub use coordinates::{fetch_coordinates, validate_coordinates, Coordinate, CoordinateFetcher};
pub use series::{align_series, AlignedSeries, CategorySeries, SeriesAggregator};
