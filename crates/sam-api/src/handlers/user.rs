//! User handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use sam_entity::user::User;
use sam_service::Profile;

use crate::dto::request::CreateUserRequest;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.accounts.profile(user.context()).await?))
}

/// POST /users (admin)
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let created = state.accounts.create_user(req.into()).await?;
    tracing::info!(
        admin_id = %user.user_id,
        user_id = %created.user_id,
        employee_id = %created.employee_id,
        "Account created via API"
    );
    Ok((StatusCode::CREATED, Json(created)))
}
