pub mod response;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};
use tracing::{info, instrument};

use crate::{
    climate::{self, RangeAggregator},
    models::{DatasetBounds, Station},
    store::ObservationStore,
};
use response::{ApiError, DailyReport, ErrorPolicy, by_date_key};

pub const API_PREFIX: &str = "/api/v1.0";

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObservationStore>,
    pub bounds: DatasetBounds,
    pub error_policy: ErrorPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn ObservationStore>, bounds: DatasetBounds) -> Self {
        Self {
            store,
            bounds,
            error_policy: ErrorPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    fn aggregator(&self) -> RangeAggregator<'_> {
        RangeAggregator::new(self.store.as_ref(), self.bounds)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/{start}", get(get_temperatures_from))
        .route("/{start}/{end}", get(get_temperatures_between))
}

pub async fn home() -> Html<String> {
    Html(format!(
        "Welcome to the Hawaii Climate Analysis API!<br/>\
         Available Routes:<br/>\
         {API_PREFIX}/precipitation<br/>\
         {API_PREFIX}/stations<br/>\
         {API_PREFIX}/tobs<br/>\
         {API_PREFIX}/YYYYmmdd   ...example: {API_PREFIX}/20170601<br/>\
         {API_PREFIX}/YYYYmmdd/YYYYmmdd   ...example: {API_PREFIX}/20170601/20170608"
    ))
}

#[instrument(skip(state))]
async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<Option<f64>>>>, ApiError> {
    let by_date = climate::precipitation_window(state.store.as_ref(), state.bounds).await?;
    Ok(Json(by_date_key(by_date)))
}

#[instrument(skip(state))]
async fn get_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, ApiError> {
    let stations = state.store.stations().await?;
    info!("Listed {} stations", stations.len());
    Ok(Json(stations))
}

#[instrument(skip(state))]
async fn get_tobs(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<f64>>>, ApiError> {
    let listing =
        climate::busiest_station_temperatures(state.store.as_ref(), state.bounds).await?;
    let by_date = listing
        .map(|(_, by_date)| by_date_key(by_date))
        .unwrap_or_default();
    Ok(Json(by_date))
}

#[instrument(skip(state))]
async fn get_temperatures_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<DailyReport>>, ApiError> {
    let start = climate::parse(&start)
        .map_err(|_| ApiError::invalid_format(state.error_policy, false))?;

    let summaries = state
        .aggregator()
        .aggregate_to_latest(start)
        .await
        .map_err(|e| ApiError::from_aggregation(state.error_policy, e))?;

    Ok(Json(summaries.iter().map(DailyReport::from).collect()))
}

#[instrument(skip(state))]
async fn get_temperatures_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<DailyReport>>, ApiError> {
    let invalid = |_: climate::ParseError| ApiError::invalid_format(state.error_policy, true);
    let start = climate::parse(&start).map_err(invalid)?;
    let end = climate::parse(&end).map_err(invalid)?;

    let summaries = state
        .aggregator()
        .aggregate(start, end)
        .await
        .map_err(|e| ApiError::from_aggregation(state.error_policy, e))?;

    Ok(Json(summaries.iter().map(DailyReport::from).collect()))
}
