//! Climate query engine
//!
//! This module provides the query logic behind the API:
//! - Parsing and validating user-supplied `YYYYMMDD` dates
//! - Per-day min/avg/max temperature aggregation over a date range
//! - Selecting the station with the most temperature observations
//! - Fixed-window precipitation and temperature listings

pub mod aggregator;
pub mod busiest;
pub mod dates;
pub mod error;
pub mod window;

pub use aggregator::RangeAggregator;
pub use busiest::select_busiest;
pub use dates::{parse, validate_not_future};
pub use error::{AggregationError, ParseError, RangeError, WindowError};
pub use window::{busiest_station_temperatures, precipitation_window};
