//! Route definitions for the HTTP API.
//!
//! Routes are grouped by the capability they require. Each group gets its
//! guard through `route_layer`, so unmatched paths still fall through to
//! a plain 404 instead of a 401.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use sam_auth::rbac::{Admin, Authenticated};

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::guard::require;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(public_routes())
        .merge(authenticated_routes(&state))
        .merge(admin_routes(&state))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Login and health
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health))
}

/// License lifecycle, own records, license browsing, dashboard, own profile
fn authenticated_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/licenses_usage_records/apply",
            post(handlers::usage::apply),
        )
        .route(
            "/licenses_usage_records/return",
            post(handlers::usage::return_license),
        )
        .route(
            "/licenses_usage_records/renew",
            post(handlers::usage::renew),
        )
        .route(
            "/licenses_usage_records/me",
            get(handlers::usage::my_records),
        )
        .route("/licenses_with_info", get(handlers::catalog::list))
        .route("/licenses_with_info/search", get(handlers::catalog::search))
        .route(
            "/licenses_with_info/{license_id}",
            get(handlers::catalog::get_license),
        )
        .route("/dashboard", get(handlers::dashboard::summary))
        .route("/users/me", get(handlers::user::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require::<Authenticated>,
        ))
}

/// License history and account creation
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/licenses_usage_records/license/{license_id}",
            get(handlers::usage::license_history),
        )
        .route("/users", post(handlers::user::create_user))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require::<Admin>,
        ))
}
