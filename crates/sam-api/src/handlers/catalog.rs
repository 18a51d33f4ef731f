//! License browsing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use sam_core::types::{LicenseId, PageResponse};
use sam_entity::license::LicenseWithInfo;

use crate::dto::request::{LicenseListQuery, LicenseSearchQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /licenses_with_info
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LicenseListQuery>,
) -> Result<Json<PageResponse<LicenseWithInfo>>, ApiError> {
    let licenses = state
        .catalog
        .list(query.filter(), query.page_request())
        .await?;
    Ok(Json(licenses))
}

/// GET /licenses_with_info/search
pub async fn search(
    State(state): State<AppState>,
    Query(search): Query<LicenseSearchQuery>,
    Query(query): Query<LicenseListQuery>,
) -> Result<Json<PageResponse<LicenseWithInfo>>, ApiError> {
    let criterion = search.criterion()?;
    let licenses = state
        .catalog
        .search(query.filter(), criterion, query.page_request())
        .await?;
    Ok(Json(licenses))
}

/// GET /licenses_with_info/{license_id}
pub async fn get_license(
    State(state): State<AppState>,
    Path(license_id): Path<LicenseId>,
) -> Result<Json<LicenseWithInfo>, ApiError> {
    Ok(Json(state.catalog.get(license_id).await?))
}
