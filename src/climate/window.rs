//! Fixed analysis window listings
//!
//! Both listings cover `[window_start, latest]` and group readings by date.
//! Readings from different stations on the same date land in the same list
//! without station attribution.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use super::busiest::select_busiest;
use super::error::WindowError;
use crate::models::{DatasetBounds, StationId};
use crate::store::ObservationStore;

/// Precipitation readings per date across all stations
#[instrument(skip(store))]
pub async fn precipitation_window(
    store: &dyn ObservationStore,
    bounds: DatasetBounds,
) -> Result<BTreeMap<NaiveDate, Vec<Option<f64>>>, WindowError> {
    let rows = store.precipitation_between(bounds.window()).await?;
    let readings = rows.len();

    let by_date = group_by_date(rows);
    info!("Listed {} precipitation readings over {} dates", readings, by_date.len());
    Ok(by_date)
}

/// Temperature readings per date for the busiest station.
///
/// Returns `None` when the store has no temperature readings.
#[instrument(skip(store))]
pub async fn busiest_station_temperatures(
    store: &dyn ObservationStore,
    bounds: DatasetBounds,
) -> Result<Option<(StationId, BTreeMap<NaiveDate, Vec<f64>>)>, WindowError> {
    let Some(station) = select_busiest(store).await? else {
        warn!("No temperature observations in store");
        return Ok(None);
    };

    let rows = store
        .station_temperatures_between(&station, bounds.window())
        .await?;
    info!("Listed {} temperature readings for {}", rows.len(), station);

    Ok(Some((station, group_by_date(rows))))
}

fn group_by_date<T>(rows: Vec<(NaiveDate, T)>) -> BTreeMap<NaiveDate, Vec<T>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for (date, value) in rows {
        by_date.entry(date).or_default().push(value);
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use crate::store::InMemoryObservationStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_store() -> InMemoryObservationStore {
        InMemoryObservationStore::new(
            vec![
                Observation::new("A", date(2016, 8, 22), 70.0, Some(1.0)),
                Observation::new("A", date(2016, 8, 23), 71.0, Some(0.1)),
                Observation::new("B", date(2016, 8, 23), 75.0, None),
                Observation::new("A", date(2017, 8, 23), 79.0, Some(0.0)),
                Observation::new("B", date(2017, 8, 23), 78.0, Some(0.3)),
                Observation::new("A", date(2017, 8, 24), 80.0, Some(0.0)),
            ],
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_precipitation_window_bounds_are_inclusive() {
        let store = create_test_store();

        let by_date = precipitation_window(&store, DatasetBounds::default())
            .await
            .unwrap();

        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[&date(2016, 8, 23)], vec![Some(0.1), None]);
        assert_eq!(by_date[&date(2017, 8, 23)], vec![Some(0.0), Some(0.3)]);
    }

    #[tokio::test]
    async fn test_busiest_station_temperatures() {
        let store = create_test_store();

        let (station, by_date) = busiest_station_temperatures(&store, DatasetBounds::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(station, "A");
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[&date(2017, 8, 23)], vec![79.0]);
        assert!(!by_date.contains_key(&date(2017, 8, 24)));
    }

    #[tokio::test]
    async fn test_busiest_station_temperatures_on_empty_store() {
        let store = InMemoryObservationStore::default();

        let result = busiest_station_temperatures(&store, DatasetBounds::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
