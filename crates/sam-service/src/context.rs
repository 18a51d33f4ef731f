//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sam_core::types::UserId;
use sam_entity::user::{Permission, User};

/// Who is acting on the current request.
///
/// Built by the capability guard from the freshly loaded account and
/// passed into every service method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The account holder's job number.
    pub employee_id: String,
    /// Current permission level.
    pub permissions: Permission,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for `user`.
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            employee_id: user.employee_id.clone(),
            permissions: user.permissions,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.permissions.is_admin()
    }
}
