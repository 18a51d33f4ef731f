//! Marker types naming what a caller must be allowed to do.
//!
//! Route groups are guarded by a capability type parameter, so the set of
//! checks is fixed at router construction.

use sam_core::error::AppError;
use sam_entity::user::User;

/// A requirement on the authenticated caller.
pub trait Capability: Send + Sync + 'static {
    /// Short name used in logs and error messages.
    const NAME: &'static str;

    /// Whether `user` holds this capability.
    fn permits(user: &User) -> bool;

    /// Fail with `Authorization` unless `user` holds this capability.
    fn check(user: &User) -> Result<(), AppError> {
        if Self::permits(user) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Requires the '{}' capability",
                Self::NAME
            )))
        }
    }
}

/// Any active account.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

impl Capability for Authenticated {
    const NAME: &'static str = "authenticated";

    fn permits(_user: &User) -> bool {
        true
    }
}

/// Administrator accounts only.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl Capability for Admin {
    const NAME: &'static str = "admin";

    fn permits(user: &User) -> bool {
        user.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sam_core::types::UserId;
    use sam_entity::user::{AccountStatus, Permission};

    use super::*;

    fn user(permissions: Permission) -> User {
        User {
            user_id: UserId::new(1),
            employee_id: "E1".to_string(),
            permissions,
            status: AccountStatus::Active,
            hashed_password: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_capability() {
        assert!(Admin::check(&user(Permission::Admin)).is_ok());
        let err = Admin::check(&user(Permission::Standard)).unwrap_err();
        assert_eq!(err.kind, sam_core::error::ErrorKind::Authorization);
    }

    #[test]
    fn test_authenticated_capability() {
        assert!(Authenticated::check(&user(Permission::Standard)).is_ok());
    }
}
