//! Dashboard handler.

use axum::Json;
use axum::extract::State;

use sam_entity::usage::UsageSummary;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /dashboard
pub async fn summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UsageSummary>, ApiError> {
    Ok(Json(state.dashboard.summary(user.context()).await?))
}
