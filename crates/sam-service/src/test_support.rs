//! Shared fixture for service tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use sam_core::config::LifecycleConfig;
use sam_core::types::{LicenseId, SoftwareInfoId};
use sam_database::MemoryStore;
use sam_database::store::{AccountStore, LicenseStore};
use sam_entity::employee::{Employee, EmployeeStatus, Gender};
use sam_entity::license::{LicenseStatus, LicenseType, SoftwareLicense};
use sam_entity::user::{CreateUser, Permission};

use crate::context::RequestContext;
use crate::lifecycle::LicenseLifecycleManager;

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub manager: LicenseLifecycleManager,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let manager =
            LicenseLifecycleManager::new(Arc::new(store.clone()), LifecycleConfig::default());
        Self { store, manager }
    }

    pub async fn employee(&self, employee_id: &str, level: i16) {
        self.store
            .insert_employee(Employee {
                employee_id: employee_id.to_string(),
                name: format!("Employee {employee_id}"),
                gender: Gender::Other,
                department: Some("IT".to_string()),
                level,
                status: EmployeeStatus::Employed,
            })
            .await;
    }

    pub async fn user(&self, employee_id: &str, level: i16) -> RequestContext {
        self.employee(employee_id, level).await;
        let user = self
            .store
            .create_user(CreateUser {
                employee_id: employee_id.to_string(),
                hashed_password: "unused".to_string(),
                permissions: Permission::Standard,
            })
            .await
            .expect("create user");
        RequestContext::for_user(&user)
    }

    pub fn license_row(id: i64, lv_limit: Option<i16>) -> SoftwareLicense {
        let now = Utc::now();
        SoftwareLicense {
            license_id: LicenseId::new(id),
            software_info_id: SoftwareInfoId::new(1),
            license_type: LicenseType::Annual,
            license_status: LicenseStatus::Available,
            license_key: Some(format!("KEY-{id}")),
            license_expired_date: None,
            lv_limit,
            remark: None,
            create_time: now,
            last_update_time: now,
        }
    }

    pub async fn license(&self, id: i64, lv_limit: Option<i16>) {
        self.store
            .insert_license(Self::license_row(id, lv_limit))
            .await;
    }

    pub async fn expired_license(&self, id: i64) {
        let mut row = Self::license_row(id, None);
        row.license_expired_date = Some(Utc::now() - Duration::days(1));
        self.store.insert_license(row).await;
    }

    pub async fn status_of(&self, id: i64) -> LicenseStatus {
        self.store
            .find_license(LicenseId::new(id))
            .await
            .expect("find license")
            .expect("license exists")
            .license_status
    }
}
