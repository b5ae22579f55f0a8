//! In-process observation store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{ObservationStore, Result};
use crate::models::{DailyTemperatureSummary, DateRange, Observation, Station, StationId};

/// Observation store holding its records in memory.
///
/// Every trait call counts as one query, so callers can check how many
/// round trips an operation would have cost against a real database.
#[derive(Debug, Default)]
pub struct InMemoryObservationStore {
    observations: Vec<Observation>,
    stations: Vec<Station>,
    queries: AtomicUsize,
}

impl InMemoryObservationStore {
    #[must_use]
    pub fn new(observations: Vec<Observation>, stations: Vec<Station>) -> Self {
        Self {
            observations,
            stations,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of queries issued so far
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    fn in_range<'a>(&'a self, range: DateRange) -> impl Iterator<Item = &'a Observation> + 'a {
        self.observations
            .iter()
            .filter(move |obs| range.contains(obs.date))
    }
}

#[async_trait]
impl ObservationStore for InMemoryObservationStore {
    async fn stations(&self) -> Result<Vec<Station>> {
        self.record_query();
        let mut stations = self.stations.clone();
        stations.sort_by_key(|station| station.id);
        Ok(stations)
    }

    async fn precipitation_between(
        &self,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, Option<f64>)>> {
        self.record_query();
        let mut rows: Vec<_> = self
            .in_range(range)
            .map(|obs| (obs.date, obs.precipitation))
            .collect();
        rows.sort_by_key(|(date, _)| *date);
        Ok(rows)
    }

    async fn temperature_counts(&self) -> Result<Vec<(StationId, i64)>> {
        self.record_query();
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for obs in &self.observations {
            *counts.entry(obs.station_id.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(station, count)| (station.to_string(), count))
            .collect())
    }

    async fn station_temperatures_between(
        &self,
        station: &str,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        self.record_query();
        let mut rows: Vec<_> = self
            .in_range(range)
            .filter(|obs| obs.station_id == station)
            .map(|obs| (obs.date, obs.temperature))
            .collect();
        rows.sort_by_key(|(date, _)| *date);
        Ok(rows)
    }

    async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailyTemperatureSummary>> {
        self.record_query();
        let readings: Vec<f64> = self
            .observations
            .iter()
            .filter(|obs| obs.date == date)
            .map(|obs| obs.temperature)
            .collect();
        Ok(DailyTemperatureSummary::from_readings(date, &readings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_default_daily_summaries_query_each_day() {
        let store = InMemoryObservationStore::new(
            vec![
                Observation::new("A", date(2017, 8, 1), 70.0, None),
                Observation::new("B", date(2017, 8, 1), 80.0, Some(0.1)),
                Observation::new("A", date(2017, 8, 3), 72.0, Some(0.0)),
            ],
            Vec::new(),
        );
        let range = DateRange::new(date(2017, 8, 1), date(2017, 8, 3)).unwrap();

        let summaries = store.daily_summaries(range).await.unwrap();

        assert_eq!(store.query_count(), 3);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].average, 75.0);
        assert_eq!(summaries[1].date, date(2017, 8, 3));
    }

    #[tokio::test]
    async fn test_precipitation_keeps_missing_values() {
        let store = InMemoryObservationStore::new(
            vec![
                Observation::new("A", date(2017, 8, 2), 70.0, None),
                Observation::new("A", date(2017, 8, 1), 70.0, Some(0.5)),
            ],
            Vec::new(),
        );
        let range = DateRange::new(date(2017, 8, 1), date(2017, 8, 2)).unwrap();

        let rows = store.precipitation_between(range).await.unwrap();

        assert_eq!(
            rows,
            vec![(date(2017, 8, 1), Some(0.5)), (date(2017, 8, 2), None)]
        );
    }
}
