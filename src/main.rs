//! SAM server: software license asset manager.
//!
//! Main entry point that loads configuration, connects to PostgreSQL, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use sam_core::config::{AppConfig, LoggingConfig};
use sam_core::error::AppError;
use sam_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e.detailed(), "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `SAM_ENV` overlay, and `SAM__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SAM_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting SAM server");

    let db = DatabasePool::connect_and_migrate(&config.database).await?;
    sam_api::run_server(config, db).await
}
