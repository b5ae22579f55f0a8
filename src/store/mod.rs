//! Observation store
//!
//! Read-only access to dated station observations. The service only ever
//! queries the store; ingestion happens elsewhere.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DailyTemperatureSummary, DateRange, Station, StationId};

pub use memory::InMemoryObservationStore;
pub use sqlite::SqliteObservationStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid database URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// All stations ordered by id
    async fn stations(&self) -> Result<Vec<Station>>;

    /// Every precipitation reading in `range`, ordered by date
    async fn precipitation_between(&self, range: DateRange)
    -> Result<Vec<(NaiveDate, Option<f64>)>>;

    /// Number of temperature readings recorded by each station
    async fn temperature_counts(&self) -> Result<Vec<(StationId, i64)>>;

    /// Temperature readings of one station in `range`, ordered by date
    async fn station_temperatures_between(
        &self,
        station: &str,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, f64)>>;

    /// Min/avg/max temperature across all stations on `date`, `None` without readings
    async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailyTemperatureSummary>>;

    /// One summary per day of `range` that has readings, ascending by date
    async fn daily_summaries(&self, range: DateRange) -> Result<Vec<DailyTemperatureSummary>> {
        let mut summaries = Vec::new();
        for day in range.days() {
            if let Some(summary) = self.daily_summary(day).await? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}
