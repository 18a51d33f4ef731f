//! License and usage-record persistence on PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use sam_core::error::{AppError, ErrorKind};
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, PageRequest, PageResponse, RecordId, SoftwareInfoId, UserId};
use sam_entity::employee::Employee;
use sam_entity::license::{LicenseFilter, LicenseStatus, LicenseWithInfo, SoftwareLicense};
use sam_entity::software::SoftwareInfo;
use sam_entity::usage::{NewUsageRecord, UsageRecord, UsageSummary};

use super::map_write_error;
use crate::store::{LicenseStore, LicenseTransaction};

/// Join and `WHERE` clause shared by the license listing queries. A `NULL`
/// parameter disables its condition.
const LICENSE_FILTER: &str = "FROM software_licenses l \
     LEFT JOIN software_info s ON s.software_info_id = l.software_info_id \
     WHERE ($1::license_type IS NULL OR l.license_type = $1) \
       AND ($2::license_status IS NULL OR l.license_status = $2) \
       AND ($3::BIGINT IS NULL OR l.software_info_id = $3) \
       AND ($4::software_type IS NULL OR s.software_info_type = $4) \
       AND ($5::TEXT IS NULL OR s.software_info_name ILIKE $5)";

/// `ILIKE` pattern matching `name` anywhere, with wildcards in it escaped.
fn contains_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// License store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgLicenseStore {
    pool: PgPool,
}

impl PgLicenseStore {
    /// Create a new license store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page_of_records(
        &self,
        count_sql: &str,
        list_sql: &str,
        key: i64,
        active_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        let total: i64 = sqlx::query_scalar(count_sql)
            .bind(key)
            .bind(active_only)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count records", e))?;

        let records = sqlx::query_as::<_, UsageRecord>(list_sql)
            .bind(key)
            .bind(active_only)
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list records", e))?;

        Ok(PageResponse::new(records, page, total as u64))
    }

    /// Pair each license with its catalog entry, fetched in one query.
    async fn attach_software(
        &self,
        licenses: Vec<SoftwareLicense>,
    ) -> AppResult<Vec<LicenseWithInfo>> {
        if licenses.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = licenses.iter().map(|l| l.software_info_id.get()).collect();
        let catalog: HashMap<SoftwareInfoId, SoftwareInfo> = sqlx::query_as::<_, SoftwareInfo>(
            "SELECT * FROM software_info WHERE software_info_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load software info", e))?
        .into_iter()
        .map(|info| (info.software_info_id, info))
        .collect();

        Ok(licenses
            .into_iter()
            .map(|license| {
                let software_info = catalog.get(&license.software_info_id).cloned();
                LicenseWithInfo {
                    license,
                    software_info,
                }
            })
            .collect())
    }
}

#[async_trait]
impl LicenseStore for PgLicenseStore {
    async fn begin(&self) -> AppResult<Box<dyn LicenseTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgLicenseTransaction { tx }))
    }

    async fn find_license(&self, id: LicenseId) -> AppResult<Option<SoftwareLicense>> {
        sqlx::query_as::<_, SoftwareLicense>("SELECT * FROM software_licenses WHERE license_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))
    }

    async fn find_license_with_info(&self, id: LicenseId) -> AppResult<Option<LicenseWithInfo>> {
        let Some(license) = self.find_license(id).await? else {
            return Ok(None);
        };
        Ok(self.attach_software(vec![license]).await?.pop())
    }

    async fn list_licenses_with_info(
        &self,
        filter: &LicenseFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<LicenseWithInfo>> {
        let name = filter.software_name.as_deref().map(contains_pattern);

        let count_sql = format!("SELECT COUNT(*) {LICENSE_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.license_type)
            .bind(filter.status)
            .bind(filter.software_id)
            .bind(filter.software_type)
            .bind(name.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count licenses", e))?;

        let list_sql =
            format!("SELECT l.* {LICENSE_FILTER} ORDER BY l.license_id LIMIT $6 OFFSET $7");
        let licenses = sqlx::query_as::<_, SoftwareLicense>(&list_sql)
            .bind(filter.license_type)
            .bind(filter.status)
            .bind(filter.software_id)
            .bind(filter.software_type)
            .bind(name.as_deref())
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list licenses", e))?;

        let items = self.attach_software(licenses).await?;
        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn find_records_by_user(
        &self,
        user_id: UserId,
        active_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        self.page_of_records(
            "SELECT COUNT(*) FROM license_usage_records \
             WHERE user_id = $1 AND (NOT $2 OR actually_return_time IS NULL)",
            "SELECT * FROM license_usage_records \
             WHERE user_id = $1 AND (NOT $2 OR actually_return_time IS NULL) \
             ORDER BY checkout_time DESC, record_id DESC LIMIT $3 OFFSET $4",
            user_id.get(),
            active_only,
            page,
        )
        .await
    }

    async fn find_records_by_license(
        &self,
        license_id: LicenseId,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        self.page_of_records(
            "SELECT COUNT(*) FROM license_usage_records \
             WHERE license_id = $1 AND (NOT $2 OR actually_return_time IS NULL)",
            "SELECT * FROM license_usage_records \
             WHERE license_id = $1 AND (NOT $2 OR actually_return_time IS NULL) \
             ORDER BY checkout_time DESC, record_id DESC LIMIT $3 OFFSET $4",
            license_id.get(),
            false,
            page,
        )
        .await
    }

    async fn usage_summary(
        &self,
        user_id: UserId,
        level: i16,
        horizon: DateTime<Utc>,
    ) -> AppResult<UsageSummary> {
        let (used, approaching, applicable): (i64, i64, i64) = sqlx::query_as(
            "SELECT \
               (SELECT COUNT(*) FROM license_usage_records \
                 WHERE user_id = $1 AND actually_return_time IS NULL), \
               (SELECT COUNT(*) FROM license_usage_records \
                 WHERE user_id = $1 AND actually_return_time IS NULL AND return_time <= $3), \
               (SELECT COUNT(*) FROM software_licenses \
                 WHERE license_status = 'available' AND (lv_limit IS NULL OR lv_limit <= $2))",
        )
        .bind(user_id)
        .bind(level)
        .bind(horizon)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute usage summary", e))?;

        Ok(UsageSummary {
            used_licenses: used as u64,
            approaching_expiry_licenses: approaching as u64,
            applicable_licenses: applicable as u64,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// An open PostgreSQL transaction over the license tables.
pub struct PgLicenseTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LicenseTransaction for PgLicenseTransaction {
    async fn lock_license(&mut self, id: LicenseId) -> AppResult<Option<SoftwareLicense>> {
        sqlx::query_as::<_, SoftwareLicense>(
            "SELECT * FROM software_licenses WHERE license_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock license", e))
    }

    async fn lock_active_record(
        &mut self,
        license_id: LicenseId,
    ) -> AppResult<Option<UsageRecord>> {
        sqlx::query_as::<_, UsageRecord>(
            "SELECT * FROM license_usage_records \
             WHERE license_id = $1 AND actually_return_time IS NULL \
             ORDER BY checkout_time DESC LIMIT 1 FOR UPDATE",
        )
        .bind(license_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active record", e))
    }

    async fn lock_record(&mut self, id: RecordId) -> AppResult<Option<UsageRecord>> {
        sqlx::query_as::<_, UsageRecord>(
            "SELECT * FROM license_usage_records WHERE record_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock record", e))
    }

    async fn find_employee_for_user(&mut self, user_id: UserId) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT e.* FROM employees e \
             JOIN users u ON u.employee_id = e.employee_id \
             WHERE u.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))
    }

    async fn insert_record(&mut self, record: NewUsageRecord) -> AppResult<UsageRecord> {
        sqlx::query_as::<_, UsageRecord>(
            "INSERT INTO license_usage_records \
             (license_id, user_id, checkout_time, duration_days, return_time, is_expired) \
             VALUES ($1, $2, $3, $4, $5, FALSE) RETURNING *",
        )
        .bind(record.license_id)
        .bind(record.user_id)
        .bind(record.checkout_time)
        .bind(record.duration_days)
        .bind(record.return_time)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to insert usage record",
                "License is already in use",
            )
        })
    }

    async fn update_record(&mut self, record: &UsageRecord) -> AppResult<()> {
        sqlx::query(
            "UPDATE license_usage_records \
             SET return_time = $2, actually_return_time = $3, is_expired = $4 \
             WHERE record_id = $1",
        )
        .bind(record.record_id)
        .bind(record.return_time)
        .bind(record.actually_return_time)
        .bind(record.is_expired)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update usage record", e))?;
        Ok(())
    }

    async fn update_license_status(
        &mut self,
        id: LicenseId,
        status: LicenseStatus,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE software_licenses SET license_status = $2, last_update_time = $3 \
             WHERE license_id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update license status", e)
        })?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let PgLicenseTransaction { tx } = *self;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let PgLicenseTransaction { tx } = *self;
        tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
