//! User entity model.

use chrono::{DateTime, Utc};
use sam_core::types::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::permission::Permission;
use super::status::AccountStatus;

/// A login account bound to exactly one employee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub user_id: UserId,
    /// The employee this account belongs to (unique).
    pub employee_id: String,
    /// Permission level.
    pub permissions: Permission,
    /// Account status.
    pub status: AccountStatus,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.permissions.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Owning employee's job number.
    pub employee_id: String,
    /// Pre-hashed password.
    pub hashed_password: String,
    /// Assigned permission level.
    pub permissions: Permission,
}
