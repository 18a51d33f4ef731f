//! Request DTOs with validation.
//!
//! Lifecycle bodies keep the field names existing clients send
//! (`LicenseID`, `Duration_Days`, ...).

use serde::{Deserialize, Serialize};
use validator::Validate;

use sam_core::error::AppError;
use sam_core::types::{LicenseId, PageRequest, RecordId, SoftwareInfoId};
use sam_entity::license::{LicenseFilter, LicenseSearch, LicenseStatus, LicenseType};
use sam_entity::user::Permission;
use sam_service::{NewAccount, RenewTarget};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Job number.
    #[validate(length(min = 1, message = "employee_id is required"))]
    pub employee_id: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Body of `POST /licenses_usage_records/apply`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyRequest {
    #[serde(rename = "LicenseID")]
    pub license_id: LicenseId,
    #[serde(rename = "Duration_Days")]
    #[validate(range(min = 1, message = "Duration_Days must be at least 1"))]
    pub duration_days: i64,
}

/// Body of `POST /licenses_usage_records/return`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReturnRequest {
    #[serde(rename = "LicenseID")]
    pub license_id: LicenseId,
}

/// Body of `POST /licenses_usage_records/renew`. Exactly one of
/// `RecordID` and `LicenseID` must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenewRequest {
    #[serde(rename = "RecordID", default)]
    pub record_id: Option<RecordId>,
    #[serde(rename = "LicenseID", default)]
    pub license_id: Option<LicenseId>,
    #[serde(rename = "Renew_Days")]
    #[validate(range(min = 1, message = "Renew_Days must be at least 1"))]
    pub renew_days: i64,
}

impl RenewRequest {
    /// Which checkout to extend.
    pub fn target(&self) -> Result<RenewTarget, AppError> {
        match (self.record_id, self.license_id) {
            (Some(record_id), None) => Ok(RenewTarget::Record(record_id)),
            (None, Some(license_id)) => Ok(RenewTarget::License(license_id)),
            _ => Err(AppError::validation(
                "Exactly one of RecordID or LicenseID is required",
            )),
        }
    }
}

/// Query string of `GET /licenses_usage_records/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyRecordsQuery {
    /// Only records that have not been returned.
    #[serde(default)]
    pub active: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Query string of `GET /licenses_with_info`, also accepted by `/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseListQuery {
    pub license_type: Option<LicenseType>,
    pub status: Option<LicenseStatus>,
    pub software_id: Option<SoftwareInfoId>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl LicenseListQuery {
    pub fn filter(&self) -> LicenseFilter {
        LicenseFilter {
            license_type: self.license_type,
            status: self.status,
            software_id: self.software_id,
            ..Default::default()
        }
    }

    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

/// Search criterion of `GET /licenses_with_info/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseSearchQuery {
    /// `software_name`, `software_type`, `license_type` or `license_status`.
    pub search_category: String,
    pub search_value: String,
}

impl LicenseSearchQuery {
    pub fn criterion(&self) -> Result<LicenseSearch, AppError> {
        LicenseSearch::parse(&self.search_category, &self.search_value)
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Job number of an existing employee.
    #[validate(length(min = 1, max = 32, message = "employee_id is required"))]
    pub employee_id: String,
    /// Initial password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Permission level, `standard` when omitted.
    #[serde(default)]
    pub permissions: Permission,
}

impl From<CreateUserRequest> for NewAccount {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            employee_id: req.employee_id,
            password: req.password,
            permissions: req.permissions,
        }
    }
}
