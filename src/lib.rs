//! `climate-api` - read-only HTTP API over weather-station observations
//!
//! This library provides the query engine behind the API: compact date
//! parsing, per-day temperature aggregation over date ranges, busiest-station
//! selection, and the fixed-window precipitation and temperature listings,
//! together with the observation store and the axum web layer serving them.

pub mod api;
pub mod climate;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use climate::{AggregationError, ParseError, RangeAggregator, RangeError, select_busiest};
pub use config::ClimateApiConfig;
pub use error::ClimateApiError;
pub use models::{DailyTemperatureSummary, DatasetBounds, DateRange, Observation, Station};
pub use store::{InMemoryObservationStore, ObservationStore, SqliteObservationStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateApiError>;
