//! Per-user dashboard counters.

use serde::{Deserialize, Serialize};

/// Counters shown on a user's dashboard.
///
/// The two renamed keys keep the spelling existing dashboard clients read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Licenses the user currently holds.
    pub used_licenses: u64,
    /// Held licenses whose due date is within the warning horizon.
    #[serde(rename = "approching_expired_licenses")]
    pub approaching_expiry_licenses: u64,
    /// Available licenses the user's level permits.
    #[serde(rename = "apllicable_licenses")]
    pub applicable_licenses: u64,
}
