//! Data models for the climate API
//!
//! This module contains the core domain models organized by concern:
//! - Observation: dated readings and the stations that produced them
//! - Summary: date ranges, dataset bounds and per-day temperature aggregates

pub mod observation;
pub mod summary;

// Re-export all public types for convenient access
pub use observation::{Observation, Station, StationId};
pub use summary::{DailyTemperatureSummary, DatasetBounds, DateRange};
