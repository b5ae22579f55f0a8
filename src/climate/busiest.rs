//! Busiest-station selection

use tracing::debug;

use crate::models::StationId;
use crate::store::{ObservationStore, Result};

/// Station with the most temperature observations.
///
/// Ties go to the lexicographically smallest station id. Returns `None`
/// when the store holds no temperature readings at all.
pub async fn select_busiest(store: &dyn ObservationStore) -> Result<Option<StationId>> {
    let counts = store.temperature_counts().await?;

    let busiest = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .min_by(|(a_id, a_count), (b_id, b_count)| {
            b_count.cmp(a_count).then_with(|| a_id.cmp(b_id))
        })
        .map(|(station, count)| {
            debug!("Busiest station {} with {} observations", station, count);
            station
        });

    Ok(busiest)
}
