//! Per-day temperature aggregation over a date range

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use super::dates::validate_not_future;
use super::error::AggregationError;
use crate::models::{DailyTemperatureSummary, DatasetBounds, DateRange};
use crate::store::ObservationStore;

/// Computes min/avg/max temperature for each day of a range.
///
/// Both entry points validate before touching the store: a date beyond the
/// dataset fails with `BeyondKnownData`, which takes precedence over a
/// reversed range (`InvalidOrder`). Days without observations are left out
/// of the result.
pub struct RangeAggregator<'a> {
    store: &'a dyn ObservationStore,
    bounds: DatasetBounds,
}

impl<'a> RangeAggregator<'a> {
    #[must_use]
    pub fn new(store: &'a dyn ObservationStore, bounds: DatasetBounds) -> Self {
        Self { store, bounds }
    }

    /// Summaries for every day with data in `[start, end]`
    #[instrument(skip(self))]
    pub async fn aggregate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTemperatureSummary>, AggregationError> {
        let range = self.validate(start, end)?;

        debug!("Aggregating {} days", range.num_days());
        let summaries = self.store.daily_summaries(range).await?;

        info!(
            "Aggregated {} of {} days between {} and {}",
            summaries.len(),
            range.num_days(),
            start,
            end
        );
        Ok(summaries)
    }

    /// Summaries for every day with data from `start` through the latest known date
    pub async fn aggregate_to_latest(
        &self,
        start: NaiveDate,
    ) -> Result<Vec<DailyTemperatureSummary>, AggregationError> {
        self.aggregate(start, self.bounds.latest).await
    }

    fn validate(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, AggregationError> {
        validate_not_future(start, self.bounds.latest)?;
        validate_not_future(end, self.bounds.latest)?;
        DateRange::new(start, end).ok_or(AggregationError::InvalidOrder)
    }
}
