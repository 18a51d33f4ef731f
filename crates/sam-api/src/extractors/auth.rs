//! `CurrentUser` extractor: the caller resolved by the capability guard.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use sam_core::error::AppError;
use sam_service::RequestContext;

use crate::error::ApiError;

/// Authenticated caller context available in handlers.
///
/// Only usable on routes behind `middleware::guard::require`; elsewhere
/// the extension is absent and the request is rejected with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl CurrentUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::authentication("Not authenticated").into())
    }
}
