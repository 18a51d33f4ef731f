//! The license lifecycle manager.
//!
//! Each operation runs in one store transaction. Every precondition is
//! checked before the first write, and any error rolls the transaction
//! back, so a failed call leaves licenses and records untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use sam_core::config::LifecycleConfig;
use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, RecordId, UserId};
use sam_database::store::{LicenseStore, LicenseTransaction};
use sam_entity::license::LicenseStatus;
use sam_entity::usage::{NewUsageRecord, UsageRecord};

use crate::context::RequestContext;

/// Which checkout a renewal applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewTarget {
    /// A specific usage record.
    Record(RecordId),
    /// The open record of a license.
    License(LicenseId),
}

/// Applies, returns, and renews license checkouts.
#[derive(Clone)]
pub struct LicenseLifecycleManager {
    store: Arc<dyn LicenseStore>,
    config: LifecycleConfig,
}

impl std::fmt::Debug for LicenseLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseLifecycleManager")
            .field("config", &self.config)
            .finish()
    }
}

impl LicenseLifecycleManager {
    /// Creates a new lifecycle manager.
    pub fn new(store: Arc<dyn LicenseStore>, config: LifecycleConfig) -> Self {
        Self { store, config }
    }

    /// Check out `license_id` for the caller for `duration_days` days.
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        license_id: LicenseId,
        duration_days: i64,
    ) -> AppResult<UsageRecord> {
        let duration_days = self.checked_days("Duration_Days", duration_days)?;

        let mut tx = self.store.begin().await?;
        let result =
            apply_in(tx.as_mut(), ctx.user_id, license_id, duration_days, Utc::now()).await;
        let record = finish(tx, result).await?;

        info!(
            user_id = %ctx.user_id,
            license_id = %license_id,
            record_id = %record.record_id,
            return_time = %record.return_time,
            "License applied"
        );
        Ok(record)
    }

    /// Return the caller's open checkout of `license_id`.
    pub async fn return_license(
        &self,
        ctx: &RequestContext,
        license_id: LicenseId,
    ) -> AppResult<UsageRecord> {
        let mut tx = self.store.begin().await?;
        let result = return_in(tx.as_mut(), ctx.user_id, license_id, Utc::now()).await;
        let record = finish(tx, result).await?;

        info!(
            user_id = %ctx.user_id,
            license_id = %license_id,
            record_id = %record.record_id,
            "License returned"
        );
        Ok(record)
    }

    /// Extend the due date of one of the caller's open checkouts.
    pub async fn renew(
        &self,
        ctx: &RequestContext,
        target: RenewTarget,
        extra_days: i64,
    ) -> AppResult<UsageRecord> {
        let extra_days = self.checked_days("Renew_Days", extra_days)?;

        let mut tx = self.store.begin().await?;
        let result = renew_in(tx.as_mut(), ctx.user_id, target, extra_days).await;
        let record = finish(tx, result).await?;

        info!(
            user_id = %ctx.user_id,
            license_id = %record.license_id,
            record_id = %record.record_id,
            extra_days,
            return_time = %record.return_time,
            "License renewed"
        );
        Ok(record)
    }

    fn checked_days(&self, field: &str, days: i64) -> AppResult<i32> {
        let max = self.config.max_duration_days;
        if !(1..=max).contains(&days) {
            return Err(AppError::validation(format!(
                "{field} must be between 1 and {max}"
            )));
        }
        i32::try_from(days)
            .map_err(|_| AppError::validation(format!("{field} must be between 1 and {max}")))
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(tx: Box<dyn LicenseTransaction>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err.detailed(), "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn apply_in(
    tx: &mut dyn LicenseTransaction,
    user_id: UserId,
    license_id: LicenseId,
    duration_days: i32,
    now: DateTime<Utc>,
) -> AppResult<UsageRecord> {
    let license = tx
        .lock_license(license_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("License {license_id} not found")))?;

    if tx.lock_active_record(license_id).await?.is_some() {
        return Err(AppError::conflict(format!(
            "License {license_id} is already in use"
        )));
    }

    let employee = tx
        .find_employee_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No employee record for the current user"))?;

    if !license.admits_level(employee.level) {
        return Err(AppError::authorization(format!(
            "Employee level {} is below the level required for license {license_id}",
            employee.level
        )));
    }

    if license.is_lapsed_at(now) {
        return Err(AppError::bad_request(format!(
            "License {license_id} has expired"
        )));
    }

    let record = tx
        .insert_record(NewUsageRecord::checkout(
            license_id,
            user_id,
            now,
            duration_days,
        ))
        .await?;
    tx.update_license_status(license_id, LicenseStatus::InUse, now)
        .await?;

    Ok(record)
}

async fn return_in(
    tx: &mut dyn LicenseTransaction,
    user_id: UserId,
    license_id: LicenseId,
    now: DateTime<Utc>,
) -> AppResult<UsageRecord> {
    tx.lock_license(license_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("License {license_id} not found")))?;

    let mut record = tx.lock_active_record(license_id).await?.ok_or_else(|| {
        AppError::not_found(format!("No active usage record for license {license_id}"))
    })?;

    if record.user_id != user_id {
        return Err(AppError::authorization(
            "Only the user who applied for the license can return it",
        ));
    }
    if !record.is_active() {
        return Err(AppError::bad_request("License has already been returned"));
    }

    record.mark_returned(now);
    tx.update_record(&record).await?;
    tx.update_license_status(license_id, LicenseStatus::Available, now)
        .await?;

    Ok(record)
}

async fn renew_in(
    tx: &mut dyn LicenseTransaction,
    user_id: UserId,
    target: RenewTarget,
    extra_days: i32,
) -> AppResult<UsageRecord> {
    let mut record = match target {
        RenewTarget::Record(record_id) => tx
            .lock_record(record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Usage record {record_id} not found")))?,
        RenewTarget::License(license_id) => {
            tx.lock_active_record(license_id).await?.ok_or_else(|| {
                AppError::not_found(format!("No active usage record for license {license_id}"))
            })?
        }
    };

    if record.user_id != user_id {
        return Err(AppError::authorization(
            "Only the user who applied for the license can renew it",
        ));
    }
    if !record.is_active() {
        return Err(AppError::bad_request("Cannot renew a returned license"));
    }

    record.extend(i64::from(extra_days))?;
    tx.update_record(&record).await?;

    Ok(record)
}
