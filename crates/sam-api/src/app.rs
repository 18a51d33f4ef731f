//! Server bootstrap: wires the PostgreSQL stores into `AppState` and
//! serves the router until a shutdown signal arrives.

use std::sync::Arc;

use tokio::net::TcpListener;

use sam_core::config::AppConfig;
use sam_core::error::{AppError, ErrorKind};
use sam_database::{DatabasePool, PgAccountStore, PgLicenseStore};

use crate::router::build_router;
use crate::state::AppState;

/// Runs the server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let bind_address = config.server.bind_address();

    let license_store = Arc::new(PgLicenseStore::new(db.pool().clone()));
    let account_store = Arc::new(PgAccountStore::new(db.pool().clone()));
    let state = AppState::build(config, license_store, account_store);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_address).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Failed to bind {bind_address}"),
            e,
        )
    })?;
    tracing::info!(address = %bind_address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("HTTP server stopped, closing database pool");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
