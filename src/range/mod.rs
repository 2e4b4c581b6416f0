//! Time Range Filtering
//!
//! Translates the dashboard's range selector (hour/day/week/month/year/custom)
//! into concrete UTC boundaries and the `start_date`/`end_date` query every
//! analytics endpoint accepts.

mod resolver;
mod types;

pub use resolver::{parse_boundary, resolve, resolve_now, system_clock, Boundary, Clock, RangeSelection};
pub use types::{iso8601, QueryString, ResolvedRange, TimeFilter, TimeRange, ALL_TIME_LABEL};
