//! License lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Tunables for license checkout, renewal, and the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Active checkouts whose due date falls within this many days are
    /// reported as approaching expiry.
    #[serde(default = "default_approaching_expiry_days")]
    pub approaching_expiry_days: i64,
    /// Upper bound for `Duration_Days` on apply and `Renew_Days` on renew.
    #[serde(default = "default_max_duration_days")]
    pub max_duration_days: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            approaching_expiry_days: default_approaching_expiry_days(),
            max_duration_days: default_max_duration_days(),
        }
    }
}

fn default_approaching_expiry_days() -> i64 {
    7
}

fn default_max_duration_days() -> i64 {
    3650
}
