//! Shared test helpers for the HTTP integration tests.
//!
//! Every `TestApp` runs the real router over its own in-memory store, so
//! tests are independent and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use sam_api::{AppState, build_router};
use sam_auth::jwt::JwtEncoder;
use sam_auth::password::PasswordHasher;
use sam_core::config::AppConfig;
use sam_core::types::{LicenseId, SoftwareInfoId, UserId};
use sam_database::MemoryStore;
use sam_database::store::AccountStore;
use sam_entity::employee::{Employee, EmployeeStatus, Gender};
use sam_entity::license::{LicenseStatus, LicenseType, SoftwareLicense};
use sam_entity::software::{SoftwareInfo, SoftwareType};
use sam_entity::user::{CreateUser, Permission, User};

/// A password that satisfies the default policy.
pub const PASSWORD: &str = "Amber-Falcon-Meadow-61";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for seeding and direct inspection
    pub store: MemoryStore,
    /// Application config
    pub config: AppConfig,
}

/// A seeded account and a token for it.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::with_database_url("postgres://unused");
        let store = MemoryStore::new();
        let state = AppState::build(
            config.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        Self {
            router: build_router(state),
            store,
            config,
        }
    }

    /// Register an employee at `level`.
    pub async fn employee(&self, employee_id: &str, level: i16) {
        self.store
            .insert_employee(Employee {
                employee_id: employee_id.to_string(),
                name: format!("Employee {employee_id}"),
                gender: Gender::Other,
                department: Some("Engineering".to_string()),
                level,
                status: EmployeeStatus::Employed,
            })
            .await;
    }

    /// Register an employee with an account and return a valid token.
    pub async fn user(&self, employee_id: &str, level: i16) -> TestUser {
        self.user_with(employee_id, level, Permission::Standard, "unused")
            .await
    }

    /// Like [`TestApp::user`], with admin permissions.
    pub async fn admin(&self, employee_id: &str) -> TestUser {
        self.user_with(employee_id, 5, Permission::Admin, "unused")
            .await
    }

    /// Register an employee whose account can log in with [`PASSWORD`].
    pub async fn user_with_password(&self, employee_id: &str, level: i16) -> TestUser {
        let hashed = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("hash password");
        self.user_with(employee_id, level, Permission::Standard, &hashed)
            .await
    }

    async fn user_with(
        &self,
        employee_id: &str,
        level: i16,
        permissions: Permission,
        hashed_password: &str,
    ) -> TestUser {
        self.employee(employee_id, level).await;
        let user = self
            .store
            .create_user(CreateUser {
                employee_id: employee_id.to_string(),
                hashed_password: hashed_password.to_string(),
                permissions,
            })
            .await
            .expect("create user");
        let token = JwtEncoder::new(&self.config.auth)
            .issue_access_token(&user)
            .expect("issue token")
            .token;
        TestUser { user, token }
    }

    /// Add a software catalog entry.
    pub async fn software(&self, id: i64, name: &str, software_type: SoftwareType) {
        self.store
            .insert_software(SoftwareInfo {
                software_info_id: SoftwareInfoId::new(id),
                software_info_name: name.to_string(),
                software_info_type: software_type,
                software_info_match_rule: None,
            })
            .await;
    }

    /// Add an available license.
    pub async fn license(&self, id: i64, lv_limit: Option<i16>) {
        self.license_of(id, 1, LicenseType::Annual, lv_limit).await;
    }

    /// Add an available license for a given catalog entry.
    pub async fn license_of(
        &self,
        id: i64,
        software_id: i64,
        license_type: LicenseType,
        lv_limit: Option<i16>,
    ) {
        let now = Utc::now();
        self.store
            .insert_license(SoftwareLicense {
                license_id: LicenseId::new(id),
                software_info_id: SoftwareInfoId::new(software_id),
                license_type,
                license_status: LicenseStatus::Available,
                license_key: Some(format!("KEY-{id:04}")),
                license_expired_date: None,
                lv_limit,
                remark: None,
                create_time: now,
                last_update_time: now,
            })
            .await;
    }

    /// Current `LicenseStatus` of a license as stored.
    pub async fn license_status(&self, id: i64) -> LicenseStatus {
        use sam_database::store::LicenseStore;

        self.store
            .find_license(LicenseId::new(id))
            .await
            .expect("find license")
            .expect("license exists")
            .license_status
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Apply for a license with the given token.
    pub async fn apply(&self, token: &str, license_id: i64, days: i64) -> TestResponse {
        self.request(
            "POST",
            "/licenses_usage_records/apply",
            Some(serde_json::json!({ "LicenseID": license_id, "Duration_Days": days })),
            Some(token),
        )
        .await
    }

    /// Return a license with the given token.
    pub async fn return_license(&self, token: &str, license_id: i64) -> TestResponse {
        self.request(
            "POST",
            "/licenses_usage_records/return",
            Some(serde_json::json!({ "LicenseID": license_id })),
            Some(token),
        )
        .await
    }
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Parse a timestamp field of the body.
    pub fn time(&self, field: &str) -> DateTime<Utc> {
        self.body[field]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| panic!("{field} is not a timestamp: {}", self.body))
    }
}
