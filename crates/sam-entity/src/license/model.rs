//! Software license model.

use chrono::{DateTime, Utc};
use sam_core::types::{LicenseId, SoftwareInfoId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::LicenseStatus;

/// Billing term of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "license_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Monthly,
    Annual,
    Perpetual,
}

/// A single license seat for a cataloged software product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SoftwareLicense {
    #[serde(rename = "LicenseID")]
    pub license_id: LicenseId,
    #[serde(rename = "SoftwareInfoID")]
    pub software_info_id: SoftwareInfoId,
    #[serde(rename = "LicenseType")]
    pub license_type: LicenseType,
    #[serde(rename = "LicenseStatus")]
    pub license_status: LicenseStatus,
    #[serde(rename = "LicenseKey")]
    pub license_key: Option<String>,
    /// `None` means the license never lapses.
    #[serde(rename = "LicenseExpiredDate")]
    pub license_expired_date: Option<DateTime<Utc>>,
    /// Minimum employee level allowed to check this license out.
    #[serde(rename = "LvLimit")]
    pub lv_limit: Option<i16>,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "CreateTime")]
    pub create_time: DateTime<Utc>,
    #[serde(rename = "LastUpdateTime")]
    pub last_update_time: DateTime<Utc>,
}

impl SoftwareLicense {
    /// Whether an employee of `level` meets the license's level limit.
    pub fn admits_level(&self, level: i16) -> bool {
        self.lv_limit.is_none_or(|limit| level >= limit)
    }

    /// Whether the license itself has lapsed at `now`.
    pub fn is_lapsed_at(&self, now: DateTime<Utc>) -> bool {
        self.license_status == LicenseStatus::Expired
            || self.license_expired_date.is_some_and(|date| date <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn license(lv_limit: Option<i16>) -> SoftwareLicense {
        let now = Utc::now();
        SoftwareLicense {
            license_id: LicenseId::new(5),
            software_info_id: SoftwareInfoId::new(1),
            license_type: LicenseType::Annual,
            license_status: LicenseStatus::Available,
            license_key: None,
            license_expired_date: None,
            lv_limit,
            remark: None,
            create_time: now,
            last_update_time: now,
        }
    }

    #[test]
    fn test_admits_level() {
        assert!(license(None).admits_level(0));
        assert!(!license(Some(3)).admits_level(2));
        assert!(license(Some(3)).admits_level(3));
        assert!(license(Some(3)).admits_level(5));
    }

    #[test]
    fn test_is_lapsed_at() {
        let now = Utc::now();
        let mut lic = license(None);
        assert!(!lic.is_lapsed_at(now));

        lic.license_expired_date = Some(now - Duration::days(1));
        assert!(lic.is_lapsed_at(now));

        lic.license_expired_date = Some(now + Duration::days(1));
        assert!(!lic.is_lapsed_at(now));

        lic.license_status = LicenseStatus::Expired;
        assert!(lic.is_lapsed_at(now));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(license(Some(3))).unwrap();
        assert_eq!(json["LicenseID"], 5);
        assert_eq!(json["LvLimit"], 3);
        assert_eq!(json["LicenseStatus"], "available");
    }
}
