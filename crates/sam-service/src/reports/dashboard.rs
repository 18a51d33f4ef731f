//! Per-user dashboard counters.

use std::sync::Arc;

use chrono::{Duration, Utc};

use sam_core::config::LifecycleConfig;
use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_database::store::{AccountStore, LicenseStore};
use sam_entity::usage::UsageSummary;

use crate::context::RequestContext;

/// Computes dashboard counters on read.
#[derive(Clone)]
pub struct DashboardService {
    licenses: Arc<dyn LicenseStore>,
    accounts: Arc<dyn AccountStore>,
    approaching_expiry: Duration,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        accounts: Arc<dyn AccountStore>,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            licenses,
            accounts,
            approaching_expiry: Duration::days(config.approaching_expiry_days),
        }
    }

    /// Counters for the caller: held licenses, held licenses due soon, and
    /// available licenses their level permits.
    pub async fn summary(&self, ctx: &RequestContext) -> AppResult<UsageSummary> {
        let employee = self
            .accounts
            .find_employee(&ctx.employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("No employee record for the current user"))?;

        let horizon = Utc::now() + self.approaching_expiry;
        self.licenses
            .usage_summary(ctx.user_id, employee.level, horizon)
            .await
    }
}
