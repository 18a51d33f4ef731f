//! # sam-api
//!
//! HTTP API layer for the software asset manager built on Axum.
//!
//! Provides the REST endpoints, the capability guard middleware,
//! extractors, DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
