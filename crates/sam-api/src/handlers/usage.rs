//! License usage handlers: apply, return, renew, and record listings.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use sam_core::types::{LicenseId, PageRequest, PageResponse};
use sam_entity::usage::UsageRecord;

use crate::dto::request::{ApplyRequest, MyRecordsQuery, RenewRequest, ReturnRequest};
use crate::error::ApiError;
use crate::extractors::{CurrentUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// POST /licenses_usage_records/apply
pub async fn apply(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<ApplyRequest>,
) -> Result<(StatusCode, Json<UsageRecord>), ApiError> {
    let record = state
        .lifecycle
        .apply(user.context(), req.license_id, req.duration_days)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /licenses_usage_records/return
pub async fn return_license(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<ReturnRequest>,
) -> Result<Json<UsageRecord>, ApiError> {
    let record = state
        .lifecycle
        .return_license(user.context(), req.license_id)
        .await?;
    Ok(Json(record))
}

/// POST /licenses_usage_records/renew
pub async fn renew(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<RenewRequest>,
) -> Result<Json<UsageRecord>, ApiError> {
    let target = req.target()?;
    let record = state
        .lifecycle
        .renew(user.context(), target, req.renew_days)
        .await?;
    Ok(Json(record))
}

/// GET /licenses_usage_records/me
pub async fn my_records(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MyRecordsQuery>,
) -> Result<Json<PageResponse<UsageRecord>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.per_page.unwrap_or(defaults.per_page),
    );
    let records = state
        .history
        .my_records(user.context(), query.active, page)
        .await?;
    Ok(Json(records))
}

/// GET /licenses_usage_records/license/{license_id} (admin)
pub async fn license_history(
    State(state): State<AppState>,
    Path(license_id): Path<LicenseId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<UsageRecord>>, ApiError> {
    let records = state
        .history
        .license_history(license_id, params.into_page_request())
        .await?;
    Ok(Json(records))
}
