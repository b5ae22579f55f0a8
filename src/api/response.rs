//! Wire format of API responses

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::climate::{AggregationError, WindowError};
use crate::models::DailyTemperatureSummary;
use crate::store::StoreError;

const DATE_FORMAT_SINGLE: &str = "date given must be in format YYYYmmdd";
const DATE_FORMAT_PLURAL: &str = "dates given must be in format YYYYmmdd";
const STORE_UNAVAILABLE: &str = "observation store unavailable";

/// Render a temperature the way the dataset's consumers expect: integral
/// values keep one decimal place (`70.0`), others print in full.
#[must_use]
pub fn fahrenheit(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1} degrees Fahrenheit")
    } else {
        format!("{value} degrees Fahrenheit")
    }
}

/// Map keyed by `YYYY-MM-DD`
pub fn by_date_key<T>(values: BTreeMap<NaiveDate, T>) -> BTreeMap<String, T> {
    values
        .into_iter()
        .map(|(date, value)| (date.format("%Y-%m-%d").to_string(), value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    #[serde(rename = "Low_Temp")]
    pub low: String,
    #[serde(rename = "Avg_Temp")]
    pub average: String,
    #[serde(rename = "High_Temp")]
    pub high: String,
}

/// One day of a range response, serialized as `{"YYYY-MM-DD": {...}}`
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub temperatures: TemperatureReport,
}

impl From<&DailyTemperatureSummary> for DailyReport {
    fn from(summary: &DailyTemperatureSummary) -> Self {
        Self {
            date: summary.date,
            temperatures: TemperatureReport {
                low: fahrenheit(summary.low),
                average: fahrenheit(summary.average),
                high: fahrenheit(summary.high),
            },
        }
    }
}

impl Serialize for DailyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date.format("%Y-%m-%d").to_string(), &self.temperatures)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// How user errors map onto HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Every user error answers 200, matching existing consumers
    #[default]
    Compatible,
    /// Malformed dates answer 400, out-of-range and reversed ranges 422
    Strict,
}

impl ErrorPolicy {
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Compatible }
    }

    fn status(self, strict_status: StatusCode) -> StatusCode {
        match self {
            Self::Compatible => StatusCode::OK,
            Self::Strict => strict_status,
        }
    }
}

/// Error answered as `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Malformed date input; `plural` selects the two-date wording
    #[must_use]
    pub fn invalid_format(policy: ErrorPolicy, plural: bool) -> Self {
        let message = if plural {
            DATE_FORMAT_PLURAL
        } else {
            DATE_FORMAT_SINGLE
        };
        Self {
            status: policy.status(StatusCode::BAD_REQUEST),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn from_aggregation(policy: ErrorPolicy, err: AggregationError) -> Self {
        match err {
            AggregationError::Store(source) => Self::store(source),
            user_error => Self {
                status: policy.status(StatusCode::UNPROCESSABLE_ENTITY),
                message: user_error.to_string(),
            },
        }
    }

    #[must_use]
    pub fn store(err: StoreError) -> Self {
        error!("Observation store query failed: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: STORE_UNAVAILABLE.to_string(),
        }
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        match err {
            WindowError::Store(source) => Self::store(source),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_formatting() {
        assert_eq!(fahrenheit(70.0), "70.0 degrees Fahrenheit");
        assert_eq!(fahrenheit(74.5), "74.5 degrees Fahrenheit");
        assert_eq!(fahrenheit(229.0 / 3.0), "76.33333333333333 degrees Fahrenheit");
    }

    #[test]
    fn test_daily_report_shape() {
        let summary = DailyTemperatureSummary {
            date: NaiveDate::from_ymd_opt(2017, 8, 1).unwrap(),
            low: 72.0,
            average: 76.5,
            high: 81.0,
        };

        let json = serde_json::to_value(DailyReport::from(&summary)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "2017-08-01": {
                    "Low_Temp": "72.0 degrees Fahrenheit",
                    "Avg_Temp": "76.5 degrees Fahrenheit",
                    "High_Temp": "81.0 degrees Fahrenheit"
                }
            })
        );
    }

    #[test]
    fn test_error_policy_statuses() {
        let compatible = ApiError::invalid_format(ErrorPolicy::Compatible, false);
        assert_eq!(compatible.status, StatusCode::OK);
        assert_eq!(compatible.message, "date given must be in format YYYYmmdd");

        let strict = ApiError::from_aggregation(ErrorPolicy::Strict, AggregationError::InvalidOrder);
        assert_eq!(strict.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(strict.message, "start date must be prior to end date");
    }

    #[test]
    fn test_store_errors_are_always_server_errors() {
        let err = ApiError::from_aggregation(
            ErrorPolicy::Compatible,
            AggregationError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "observation store unavailable");
    }
}
