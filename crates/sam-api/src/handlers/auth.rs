//! Auth handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::LoginRequest;
use crate::dto::response::LoginResponse;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (_user, token) = state.accounts.login(&req.employee_id, &req.password).await?;
    Ok(Json(token.into()))
}
