//! Response DTOs.
//!
//! Entities (`UsageRecord`, `UsageSummary`, `PageResponse`) are returned
//! as-is; only responses with no entity counterpart live here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sam_auth::jwt::AccessToken;

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AccessToken> for LoginResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            token_type: "bearer".to_string(),
            expires_at: token.expires_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    pub version: String,
    /// `"connected"` or `"unavailable"`.
    pub database: String,
}
