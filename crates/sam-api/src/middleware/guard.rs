//! Capability guard.
//!
//! Layered onto a route group with
//! `route_layer(from_fn_with_state(state, require::<C>))`. Resolves the
//! bearer token to a live account, checks `C`, and leaves a
//! [`RequestContext`] in the request extensions for handlers.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tracing::debug;

use sam_auth::rbac::Capability;
use sam_core::error::AppError;
use sam_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Reject the request unless the caller holds capability `C`.
///
/// Missing or invalid credentials give 401; a valid caller without `C`
/// gets 403.
pub async fn require<C: Capability>(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Authorization(bearer) = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::authentication("Not authenticated"))?;

    let claims = state.jwt_decoder.decode_access_token(bearer.token())?;
    let user = state
        .accounts
        .resolve_active_user(claims.user_id()?)
        .await?;

    if let Err(err) = C::check(&user) {
        debug!(user_id = %user.user_id, capability = C::NAME, "Capability check failed");
        return Err(err.into());
    }

    request
        .extensions_mut()
        .insert(RequestContext::for_user(&user));
    Ok(next.run(request).await)
}
