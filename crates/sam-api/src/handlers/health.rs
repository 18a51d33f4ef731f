//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label, database) = match state.license_store.health_check().await {
        Ok(true) => (StatusCode::OK, "ok", "connected"),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable"),
        Err(e) => {
            tracing::warn!(error = %e.detailed(), "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}
