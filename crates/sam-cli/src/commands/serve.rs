//! Start the HTTP server.

use clap::Args;

use sam_core::config::AppConfig;
use sam_core::error::AppError;
use sam_database::DatabasePool;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip applying pending migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_migrate {
        config.database.run_migrations = false;
    }

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        version = env!("CARGO_PKG_VERSION"),
        "Starting SAM server"
    );

    let db = DatabasePool::connect_and_migrate(&config.database).await?;
    sam_api::run_server(config, db).await
}
