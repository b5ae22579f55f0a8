//! Error types and handling for the climate API application

use thiserror::Error;

use crate::store::StoreError;

/// Main error type for the climate API application
#[derive(Error, Debug)]
pub enum ClimateApiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Observation store errors
    #[error("Store error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ClimateApiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateApiError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            ClimateApiError::Store { .. } => {
                "Unable to read the observation database. Please check the database URL."
                    .to_string()
            }
            ClimateApiError::Io { .. } => {
                "Network or file operation failed. Please check the server address and permissions."
                    .to_string()
            }
        }
    }
}

/// Message shown to the operator when startup fails.
///
/// Uses the `user_message` of the first `ClimateApiError` in the chain and
/// falls back to the full chain otherwise.
#[must_use]
pub fn startup_message(err: &anyhow::Error) -> String {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ClimateApiError>())
        .map_or_else(|| format!("{err:#}"), ClimateApiError::user_message)
}
