use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use climate_api::api::response::ErrorPolicy;
use climate_api::error::startup_message;
use climate_api::{
    AppState, ClimateApiConfig, ClimateApiError, SqliteObservationStore, telemetry, web,
};

/// Read-only HTTP API over Hawaii weather-station observations
#[derive(Parser, Debug)]
#[command(name = "climate-api", version, about)]
struct Cli {
    /// Configuration file (defaults to <config dir>/climate-api/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database URL, overriding the configuration
    #[arg(short, long)]
    database: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            eprintln!("{}", startup_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClimateApiConfig::load_from_path(cli.config)?;
    if let Some(database) = cli.database {
        config.database.url = database;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.validate()?;

    let _telemetry = telemetry::init(&config.logging)?;
    info!("Starting climate-api {}", climate_api::VERSION);

    let store =
        SqliteObservationStore::connect(&config.database.url, config.database.max_connections)
            .await
            .map_err(ClimateApiError::from)
            .with_context(|| {
                format!("Failed to open observation store {}", config.database.url)
            })?;

    let state = AppState::new(Arc::new(store.clone()), config.dataset.bounds())
        .with_error_policy(ErrorPolicy::from_strict(config.server.strict_status_codes));

    let served = web::run(&config.server, state).await;
    store.close().await;
    served
}
