//! License status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of a license.
///
/// `InUse` holds iff the license has an active usage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "license_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Free to be checked out.
    Available,
    /// Checked out by a user.
    InUse,
    /// No longer usable.
    Expired,
}

impl LicenseStatus {
    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
