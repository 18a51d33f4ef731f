//! JWT claims carried by access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sam_core::error::AppError;
use sam_core::types::UserId;
use sam_entity::user::Permission;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, as a decimal string.
    pub sub: String,
    /// Employee job number of the account holder.
    pub employee_id: String,
    /// Permission at the time of issuance. Informational only; guards
    /// re-read the account on every request.
    pub permissions: Permission,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim into a user id.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::authentication("Invalid token subject"))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
