//! SQLite-backed observation store
//!
//! Reads the `measurement` and `station` tables of the Hawaii climate
//! dataset. Dates are stored as `YYYY-MM-DD` text, so range filters compare
//! lexicographically and still follow calendar order.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use super::{ObservationStore, Result, StoreError};
use crate::models::{DailyTemperatureSummary, DateRange, Station, StationId};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SqliteObservationStore {
    pool: SqlitePool,
}

impl SqliteObservationStore {
    /// Open the database at `url` read-only with a bounded connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })?
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        info!("Opened observation store at {}", url);
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ObservationStore for SqliteObservationStore {
    #[instrument(level = "debug", skip(self))]
    async fn stations(&self) -> Result<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT id, station, name, latitude, longitude, elevation FROM station ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stations)
    }

    #[instrument(level = "debug", skip(self))]
    async fn precipitation_between(
        &self,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, Option<f64>)>> {
        let rows = sqlx::query_as::<_, (NaiveDate, Option<f64>)>(
            "SELECT date, prcp FROM measurement \
             WHERE date >= ? AND date <= ? \
             ORDER BY date, id",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(level = "debug", skip(self))]
    async fn temperature_counts(&self) -> Result<Vec<(StationId, i64)>> {
        let rows = sqlx::query_as::<_, (StationId, i64)>(
            "SELECT station, COUNT(tobs) FROM measurement GROUP BY station",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(level = "debug", skip(self))]
    async fn station_temperatures_between(
        &self,
        station: &str,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let rows = sqlx::query_as::<_, (NaiveDate, f64)>(
            "SELECT date, tobs FROM measurement \
             WHERE station = ? AND date >= ? AND date <= ? AND tobs IS NOT NULL \
             ORDER BY date, id",
        )
        .bind(station)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(level = "debug", skip(self))]
    async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailyTemperatureSummary>> {
        // Aggregates over an empty day yield a single row of NULLs
        let (low, average, high) = sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>)>(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date = ?",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(match (low, average, high) {
            (Some(low), Some(average), Some(high)) => Some(DailyTemperatureSummary {
                date,
                low,
                average,
                high,
            }),
            _ => None,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn daily_summaries(&self, range: DateRange) -> Result<Vec<DailyTemperatureSummary>> {
        let summaries = sqlx::query_as::<_, DailyTemperatureSummary>(
            "SELECT date, MIN(tobs) AS low, AVG(tobs) AS average, MAX(tobs) AS high \
             FROM measurement \
             WHERE date >= ? AND date <= ? AND tobs IS NOT NULL \
             GROUP BY date \
             ORDER BY date",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Grouped query returned {} of {} days",
            summaries.len(),
            range.num_days()
        );
        Ok(summaries)
    }
}
