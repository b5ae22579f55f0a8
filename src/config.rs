//! Configuration management for the climate API
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ClimateApiError;
use crate::models::DatasetBounds;
use crate::models::summary::{LATEST_KNOWN_DATE, WINDOW_START_DATE};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the climate API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimateApiConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Observation database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Dataset bounds
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Answer errors with 400/422 instead of 200
    #[serde(default)]
    pub strict_status_codes: bool,
}

/// Observation database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Bounds of the observation dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// First day of the fixed analysis window
    #[serde(default = "default_window_start")]
    pub window_start: NaiveDate,
    /// Latest day with observations
    #[serde(default = "default_latest_date")]
    pub latest_date: NaiveDate,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP endpoint for span export
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_database_url() -> String {
    "sqlite://Resources/hawaii.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_window_start() -> NaiveDate {
    WINDOW_START_DATE
}

fn default_latest_date() -> NaiveDate {
    LATEST_KNOWN_DATE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            strict_status_codes: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            latest_date: default_latest_date(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl DatasetConfig {
    #[must_use]
    pub fn bounds(&self) -> DatasetBounds {
        DatasetBounds {
            window_start: self.window_start,
            latest: self.latest_date,
        }
    }
}

impl ClimateApiConfig {
    /// Load configuration from the given file (or the default location),
    /// then environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. CLIMATE_API__SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("CLIMATE_API")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimateApiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("climate-api").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.database.url.is_empty() {
            self.database.url = default_database_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self
            .logging
            .otlp_endpoint
            .as_deref()
            .is_some_and(str::is_empty)
        {
            self.logging.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_dataset()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ClimateApiError::config("Server port must be greater than 0").into());
        }

        if self.server.request_timeout_seconds == 0 || self.server.request_timeout_seconds > 300 {
            return Err(ClimateApiError::config(
                "Request timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.database.max_connections == 0 || self.database.max_connections > 64 {
            return Err(ClimateApiError::config(
                "Database max connections must be between 1 and 64",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateApiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateApiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ClimateApiError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(ClimateApiError::config(format!(
                "Unsupported database URL '{}'. Only sqlite: URLs are supported",
                self.database.url
            ))
            .into());
        }

        Ok(())
    }

    /// Validate dataset bounds
    fn validate_dataset(&self) -> Result<()> {
        if self.dataset.window_start > self.dataset.latest_date {
            return Err(ClimateApiError::config(format!(
                "Dataset window start {} is after latest date {}",
                self.dataset.window_start, self.dataset.latest_date
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes tests that load from the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = ClimateApiConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert!(!config.server.strict_status_codes);
        assert_eq!(config.database.url, "sqlite://Resources/hawaii.sqlite");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.dataset.bounds(), DatasetBounds::default());
        assert!(config.logging.otlp_endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ClimateApiConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ClimateApiConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Request timeout"));
    }

    #[test]
    fn test_config_validation_rejects_non_sqlite_url() {
        let mut config = ClimateApiConfig::default();
        config.database.url = "postgres://localhost/hawaii".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Unsupported database URL"));
    }

    #[test]
    fn test_config_validation_reversed_dataset_window() {
        let mut config = ClimateApiConfig::default();
        config.dataset.window_start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("after latest date"));
    }

    #[test]
    fn test_apply_defaults_clears_empty_endpoint() {
        let mut config = ClimateApiConfig::default();
        config.logging.otlp_endpoint = Some(String::new());
        config.server.host = String::new();
        config.apply_defaults();
        assert!(config.logging.otlp_endpoint.is_none());
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("climate-api-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\nstrict_status_codes = true\n\n[dataset]\nlatest_date = \"2017-08-20\""
        )
        .unwrap();

        let config = {
            let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            ClimateApiConfig::load_from_path(Some(path)).unwrap()
        };
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.server.strict_status_codes);
        assert_eq!(config.dataset.latest_date.to_string(), "2017-08-20");
        assert_eq!(config.dataset.window_start.to_string(), "2016-08-23");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_environment_variable_override() {
        let missing = env::temp_dir().join("climate-api-no-such-config.toml");
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: ENV_LOCK keeps other config tests from reading the environment concurrently
        unsafe {
            env::set_var("CLIMATE_API__SERVER__PORT", "8181");
            env::set_var("CLIMATE_API__SERVER__STRICT_STATUS_CODES", "true");
        }

        let result = ClimateApiConfig::load_from_path(Some(missing));

        // SAFETY: Test cleanup, still under ENV_LOCK
        unsafe {
            env::remove_var("CLIMATE_API__SERVER__PORT");
            env::remove_var("CLIMATE_API__SERVER__STRICT_STATUS_CODES");
        }

        let config = result.unwrap();
        assert_eq!(config.server.port, 8181);
        assert!(config.server.strict_status_codes);
        assert_eq!(config.server.request_timeout_seconds, 30);
    }

    #[test]
    fn test_config_path_generation() {
        let path = ClimateApiConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("climate-api"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
