//! Store traits consumed by the service layer.
//!
//! The lifecycle operations need a transaction that can lock a license
//! row, inspect and mutate usage records, and then either commit or roll
//! back as a unit. Read-side queries (license listings, history, dashboard
//! counters) run outside a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sam_core::result::AppResult;
use sam_core::types::{LicenseId, PageRequest, PageResponse, RecordId, UserId};
use sam_entity::employee::{Employee, NewEmployee};
use sam_entity::license::{LicenseFilter, LicenseStatus, LicenseWithInfo, SoftwareLicense};
use sam_entity::usage::{NewUsageRecord, UsageRecord, UsageSummary};
use sam_entity::user::{CreateUser, User};

/// Entry point for license and usage-record persistence.
#[async_trait]
pub trait LicenseStore: Send + Sync + 'static {
    /// Open a transaction.
    async fn begin(&self) -> AppResult<Box<dyn LicenseTransaction>>;

    /// Read a license without locking it.
    async fn find_license(&self, id: LicenseId) -> AppResult<Option<SoftwareLicense>>;

    /// A license with its catalog entry.
    async fn find_license_with_info(&self, id: LicenseId) -> AppResult<Option<LicenseWithInfo>>;

    /// Licenses matching `filter`, joined with their catalog entries, in
    /// license id order.
    async fn list_licenses_with_info(
        &self,
        filter: &LicenseFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<LicenseWithInfo>>;

    /// A user's records, most recent checkout first.
    async fn find_records_by_user(
        &self,
        user_id: UserId,
        active_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>>;

    /// Every record of a license, most recent checkout first.
    async fn find_records_by_license(
        &self,
        license_id: LicenseId,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>>;

    /// Dashboard counters for a user of the given level. Active records due
    /// at or before `horizon` count as approaching expiry.
    async fn usage_summary(
        &self,
        user_id: UserId,
        level: i16,
        horizon: DateTime<Utc>,
    ) -> AppResult<UsageSummary>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// A single unit of work against the license tables.
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// its writes.
#[async_trait]
pub trait LicenseTransaction: Send {
    /// Fetch a license and hold a write lock on it until the transaction ends.
    async fn lock_license(&mut self, id: LicenseId) -> AppResult<Option<SoftwareLicense>>;

    /// Fetch and lock the open record of a license, newest checkout first.
    async fn lock_active_record(&mut self, license_id: LicenseId)
    -> AppResult<Option<UsageRecord>>;

    /// Fetch and lock a record by id.
    async fn lock_record(&mut self, id: RecordId) -> AppResult<Option<UsageRecord>>;

    /// The employee behind a user account.
    async fn find_employee_for_user(&mut self, user_id: UserId) -> AppResult<Option<Employee>>;

    /// Insert a checkout. Fails with `Conflict` if the license already has
    /// an open record.
    async fn insert_record(&mut self, record: NewUsageRecord) -> AppResult<UsageRecord>;

    /// Persist the mutable columns of a record (due date, return time,
    /// expiry flag).
    async fn update_record(&mut self, record: &UsageRecord) -> AppResult<()>;

    /// Set a license's status and last-update timestamp.
    async fn update_license_status(
        &mut self,
        id: LicenseId,
        status: LicenseStatus,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Make every write visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Persistence for employees and login accounts.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    async fn find_user_by_employee(&self, employee_id: &str) -> AppResult<Option<User>>;

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>>;

    /// Create an account. Fails with `Conflict` if the employee already has one.
    async fn create_user(&self, data: CreateUser) -> AppResult<User>;

    /// Register an employee. Fails with `Conflict` on a duplicate job number.
    async fn create_employee(&self, data: NewEmployee) -> AppResult<Employee>;
}
