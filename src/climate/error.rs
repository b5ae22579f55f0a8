use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// Malformed date input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("date '{0}' is not formatted as YYYYmmdd")]
    InvalidFormat(String),
}

/// Date outside the dataset bounds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("no data beyond {latest}")]
    BeyondKnownData { latest: NaiveDate },
}

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("no data beyond {latest}")]
    BeyondKnownData { latest: NaiveDate },

    #[error("start date must be prior to end date")]
    InvalidOrder,

    #[error("Observation store error: {0}")]
    Store(#[from] StoreError),
}

impl From<RangeError> for AggregationError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::BeyondKnownData { latest } => AggregationError::BeyondKnownData { latest },
        }
    }
}

/// Failure of the fixed-window listings
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Observation store error: {0}")]
    Store(#[from] StoreError),
}
