//! In-memory store for tests and single-node demos.
//!
//! Transactions take the store's mutex for their whole lifetime and work on
//! a private copy of the state; commit swaps the copy in, anything else
//! drops it. This gives the same serial view of license rows that
//! `SELECT ... FOR UPDATE` gives on PostgreSQL.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, PageRequest, PageResponse, RecordId, SoftwareInfoId, UserId};
use sam_entity::employee::{Employee, NewEmployee};
use sam_entity::license::{LicenseFilter, LicenseStatus, LicenseWithInfo, SoftwareLicense};
use sam_entity::software::SoftwareInfo;
use sam_entity::usage::{NewUsageRecord, UsageRecord, UsageSummary};
use sam_entity::user::{AccountStatus, CreateUser, User};

use crate::store::{AccountStore, LicenseStore, LicenseTransaction};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    employees: HashMap<String, Employee>,
    users: BTreeMap<UserId, User>,
    software: BTreeMap<SoftwareInfoId, SoftwareInfo>,
    licenses: BTreeMap<LicenseId, SoftwareLicense>,
    records: BTreeMap<RecordId, UsageRecord>,
    last_user_id: i64,
    last_record_id: i64,
}

impl MemoryState {
    fn employee_for_user(&self, user_id: UserId) -> Option<&Employee> {
        self.users
            .get(&user_id)
            .and_then(|user| self.employees.get(&user.employee_id))
    }

    fn active_record(&self, license_id: LicenseId) -> Option<&UsageRecord> {
        self.records
            .values()
            .filter(|r| r.license_id == license_id && r.is_active())
            .max_by_key(|r| (r.checkout_time, r.record_id))
    }

    fn page<F>(&self, page: PageRequest, filter: F) -> PageResponse<UsageRecord>
    where
        F: Fn(&UsageRecord) -> bool,
    {
        let mut matching: Vec<&UsageRecord> = self.records.values().filter(|r| filter(r)).collect();
        matching.sort_by(|a, b| {
            (b.checkout_time, b.record_id).cmp(&(a.checkout_time, a.record_id))
        });
        paginate(matching.into_iter().cloned().collect(), page)
    }

    fn with_info(&self, license: &SoftwareLicense) -> LicenseWithInfo {
        LicenseWithInfo {
            license: license.clone(),
            software_info: self.software.get(&license.software_info_id).cloned(),
        }
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();
    PageResponse::new(items, page, total)
}

/// Store holding every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an employee row.
    pub async fn insert_employee(&self, employee: Employee) {
        let mut state = self.state.lock().await;
        state.employees.insert(employee.employee_id.clone(), employee);
    }

    /// Add or replace a software catalog row.
    pub async fn insert_software(&self, software: SoftwareInfo) {
        let mut state = self.state.lock().await;
        state.software.insert(software.software_info_id, software);
    }

    /// Add or replace a license row.
    pub async fn insert_license(&self, license: SoftwareLicense) {
        let mut state = self.state.lock().await;
        state.licenses.insert(license.license_id, license);
    }

    /// Change an account's status.
    pub async fn set_account_status(&self, user_id: UserId, status: AccountStatus) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&user_id) {
            user.status = status;
        }
    }

    /// Make the next transaction commit fail, discarding its writes.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LicenseStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn LicenseTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        let fail_commit = self.fail_next_commit.swap(false, Ordering::SeqCst);
        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            fail_commit,
        }))
    }

    async fn find_license(&self, id: LicenseId) -> AppResult<Option<SoftwareLicense>> {
        Ok(self.state.lock().await.licenses.get(&id).cloned())
    }

    async fn find_license_with_info(&self, id: LicenseId) -> AppResult<Option<LicenseWithInfo>> {
        let state = self.state.lock().await;
        Ok(state.licenses.get(&id).map(|license| state.with_info(license)))
    }

    async fn list_licenses_with_info(
        &self,
        filter: &LicenseFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<LicenseWithInfo>> {
        let state = self.state.lock().await;
        let matching: Vec<LicenseWithInfo> = state
            .licenses
            .values()
            .map(|license| state.with_info(license))
            .filter(|row| filter.matches(&row.license, row.software_info.as_ref()))
            .collect();
        Ok(paginate(matching, page))
    }

    async fn find_records_by_user(
        &self,
        user_id: UserId,
        active_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        let state = self.state.lock().await;
        Ok(state.page(page, |r| {
            r.user_id == user_id && (!active_only || r.is_active())
        }))
    }

    async fn find_records_by_license(
        &self,
        license_id: LicenseId,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        let state = self.state.lock().await;
        Ok(state.page(page, |r| r.license_id == license_id))
    }

    async fn usage_summary(
        &self,
        user_id: UserId,
        level: i16,
        horizon: DateTime<Utc>,
    ) -> AppResult<UsageSummary> {
        let state = self.state.lock().await;
        let held: Vec<&UsageRecord> = state
            .records
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .collect();
        let applicable = state
            .licenses
            .values()
            .filter(|l| l.license_status == LicenseStatus::Available && l.admits_level(level))
            .count();

        Ok(UsageSummary {
            used_licenses: held.len() as u64,
            approaching_expiry_licenses: held.iter().filter(|r| r.return_time <= horizon).count()
                as u64,
            applicable_licenses: applicable as u64,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_employee(&self, employee_id: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.employee_id == employee_id)
            .cloned())
    }

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        Ok(self.state.lock().await.employees.get(employee_id).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if !state.employees.contains_key(&data.employee_id) {
            return Err(AppError::database(format!(
                "Employee '{}' does not exist",
                data.employee_id
            )));
        }
        if state.users.values().any(|u| u.employee_id == data.employee_id) {
            return Err(AppError::conflict("Employee already has an account"));
        }

        state.last_user_id += 1;
        let user = User {
            user_id: UserId::new(state.last_user_id),
            employee_id: data.employee_id,
            permissions: data.permissions,
            status: AccountStatus::Active,
            hashed_password: data.hashed_password,
            created_at: Utc::now(),
        };
        state.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn create_employee(&self, data: NewEmployee) -> AppResult<Employee> {
        let mut state = self.state.lock().await;
        if state.employees.contains_key(&data.employee_id) {
            return Err(AppError::conflict("Employee id is already registered"));
        }
        let employee = data.into_employee();
        state
            .employees
            .insert(employee.employee_id.clone(), employee.clone());
        Ok(employee)
    }
}

/// A transaction holding the store lock and a private copy of the state.
struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_commit: bool,
}

#[async_trait]
impl LicenseTransaction for MemoryTransaction {
    async fn lock_license(&mut self, id: LicenseId) -> AppResult<Option<SoftwareLicense>> {
        Ok(self.working.licenses.get(&id).cloned())
    }

    async fn lock_active_record(
        &mut self,
        license_id: LicenseId,
    ) -> AppResult<Option<UsageRecord>> {
        Ok(self.working.active_record(license_id).cloned())
    }

    async fn lock_record(&mut self, id: RecordId) -> AppResult<Option<UsageRecord>> {
        Ok(self.working.records.get(&id).cloned())
    }

    async fn find_employee_for_user(&mut self, user_id: UserId) -> AppResult<Option<Employee>> {
        Ok(self.working.employee_for_user(user_id).cloned())
    }

    async fn insert_record(&mut self, record: NewUsageRecord) -> AppResult<UsageRecord> {
        if !self.working.licenses.contains_key(&record.license_id) {
            return Err(AppError::database(format!(
                "License {} does not exist",
                record.license_id
            )));
        }
        if self.working.active_record(record.license_id).is_some() {
            return Err(AppError::conflict("License is already in use"));
        }

        self.working.last_record_id += 1;
        let stored = record.into_record(RecordId::new(self.working.last_record_id));
        self.working.records.insert(stored.record_id, stored.clone());
        Ok(stored)
    }

    async fn update_record(&mut self, record: &UsageRecord) -> AppResult<()> {
        if let Some(existing) = self.working.records.get_mut(&record.record_id) {
            existing.return_time = record.return_time;
            existing.actually_return_time = record.actually_return_time;
            existing.is_expired = record.is_expired;
        }
        Ok(())
    }

    async fn update_license_status(
        &mut self,
        id: LicenseId,
        status: LicenseStatus,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(license) = self.working.licenses.get_mut(&id) {
            license.license_status = status;
            license.last_update_time = at;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction {
            mut guard,
            working,
            fail_commit,
        } = *self;
        if fail_commit {
            return Err(AppError::database("Commit failed"));
        }
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sam_entity::employee::{EmployeeStatus, Gender};
    use sam_entity::license::LicenseType;
    use sam_entity::user::Permission;

    fn license(id: i64) -> SoftwareLicense {
        let now = Utc::now();
        SoftwareLicense {
            license_id: LicenseId::new(id),
            software_info_id: SoftwareInfoId::new(1),
            license_type: LicenseType::Annual,
            license_status: LicenseStatus::Available,
            license_key: None,
            license_expired_date: None,
            lv_limit: None,
            remark: None,
            create_time: now,
            last_update_time: now,
        }
    }

    async fn seeded() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        store
            .insert_employee(Employee {
                employee_id: "E1".into(),
                name: "Ada".into(),
                gender: Gender::Female,
                department: None,
                level: 3,
                status: EmployeeStatus::Employed,
            })
            .await;
        store.insert_license(license(1)).await;
        let user = store
            .create_user(CreateUser {
                employee_id: "E1".into(),
                hashed_password: "x".into(),
                permissions: Permission::Standard,
            })
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let (store, user) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_record(NewUsageRecord::checkout(LicenseId::new(1), user.user_id, Utc::now(), 5))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let page = store
            .find_records_by_user(user.user_id, false, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn test_second_active_insert_conflicts() {
        let (store, user) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_record(NewUsageRecord::checkout(LicenseId::new(1), user.user_id, Utc::now(), 5))
            .await
            .unwrap();
        let err = tx
            .insert_record(NewUsageRecord::checkout(LicenseId::new(1), user.user_id, Utc::now(), 5))
            .await
            .unwrap_err();
        assert_eq!(err.kind, sam_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_failed_commit_discards_writes() {
        let (store, _) = seeded().await;
        store.fail_next_commit();
        let mut tx = store.begin().await.unwrap();
        tx.update_license_status(LicenseId::new(1), LicenseStatus::InUse, Utc::now())
            .await
            .unwrap();
        assert!(tx.commit().await.is_err());

        let lic = store.find_license(LicenseId::new(1)).await.unwrap().unwrap();
        assert_eq!(lic.license_status, LicenseStatus::Available);
    }

    #[tokio::test]
    async fn test_license_listing_joins_catalog() {
        use sam_entity::software::SoftwareType;

        let (store, _) = seeded().await;
        store
            .insert_software(SoftwareInfo {
                software_info_id: SoftwareInfoId::new(1),
                software_info_name: "AutoCAD".into(),
                software_info_type: SoftwareType::Design,
                software_info_match_rule: None,
            })
            .await;
        let mut orphan = license(2);
        orphan.software_info_id = SoftwareInfoId::new(9);
        store.insert_license(orphan).await;

        let all = store
            .list_licenses_with_info(&LicenseFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_items, 2);
        assert_eq!(
            all.items[0].software_info.as_ref().map(|i| i.software_info_name.as_str()),
            Some("AutoCAD")
        );
        assert!(all.items[1].software_info.is_none());

        let by_name = LicenseFilter {
            software_name: Some("autocad".into()),
            ..Default::default()
        };
        let found = store
            .list_licenses_with_info(&by_name, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(found.total_items, 1);
        assert_eq!(found.items[0].license.license_id, LicenseId::new(1));

        assert!(store
            .find_license_with_info(LicenseId::new(3))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_account_conflicts() {
        let (store, _) = seeded().await;
        let err = store
            .create_user(CreateUser {
                employee_id: "E1".into(),
                hashed_password: "y".into(),
                permissions: Permission::Admin,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, sam_core::error::ErrorKind::Conflict);
    }
}
