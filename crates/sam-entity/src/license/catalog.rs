//! License listings joined with their software catalog entry.

use serde::de::IntoDeserializer;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::{Deserialize, Serialize};

use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::SoftwareInfoId;

use super::model::{LicenseType, SoftwareLicense};
use super::status::LicenseStatus;
use crate::software::{SoftwareInfo, SoftwareType};

/// A license row with its catalog entry inlined.
///
/// `software_info` is `None` when the referenced catalog row is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseWithInfo {
    #[serde(flatten)]
    pub license: SoftwareLicense,
    pub software_info: Option<SoftwareInfo>,
}

/// Conditions a listed license must meet. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseFilter {
    pub license_type: Option<LicenseType>,
    pub status: Option<LicenseStatus>,
    pub software_id: Option<SoftwareInfoId>,
    pub software_type: Option<SoftwareType>,
    /// Case-insensitive substring of the software name.
    pub software_name: Option<String>,
}

impl LicenseFilter {
    /// Add a search criterion on top of the filter.
    ///
    /// Returns `None` when the criterion contradicts a condition already set,
    /// in which case no license can match.
    pub fn narrowed(mut self, search: LicenseSearch) -> Option<Self> {
        fn merge<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
            match slot {
                Some(existing) => *existing == value,
                None => {
                    *slot = Some(value);
                    true
                }
            }
        }

        let consistent = match search {
            LicenseSearch::SoftwareName(name) => merge(&mut self.software_name, name),
            LicenseSearch::SoftwareType(kind) => merge(&mut self.software_type, kind),
            LicenseSearch::LicenseType(kind) => merge(&mut self.license_type, kind),
            LicenseSearch::LicenseStatus(status) => merge(&mut self.status, status),
        };
        consistent.then_some(self)
    }

    /// Whether a license and its catalog entry satisfy every condition.
    pub fn matches(&self, license: &SoftwareLicense, info: Option<&SoftwareInfo>) -> bool {
        if self.license_type.is_some_and(|t| t != license.license_type)
            || self.status.is_some_and(|s| s != license.license_status)
            || self.software_id.is_some_and(|id| id != license.software_info_id)
        {
            return false;
        }
        if self
            .software_type
            .is_some_and(|kind| info.is_none_or(|i| i.software_info_type != kind))
        {
            return false;
        }
        if let Some(name) = &self.software_name {
            let needle = name.to_lowercase();
            return info.is_some_and(|i| i.software_info_name.to_lowercase().contains(&needle));
        }
        true
    }
}

/// A single search criterion picked by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseSearch {
    SoftwareName(String),
    SoftwareType(SoftwareType),
    LicenseType(LicenseType),
    LicenseStatus(LicenseStatus),
}

impl LicenseSearch {
    /// Build a criterion from a category name and its raw value.
    ///
    /// Categories are `software_name`, `software_type`, `license_type` and
    /// `license_status`; enum values use their wire spelling.
    pub fn parse(category: &str, value: &str) -> AppResult<Self> {
        match category {
            "software_name" => Ok(Self::SoftwareName(value.to_string())),
            "software_type" => parse_value(category, value).map(Self::SoftwareType),
            "license_type" => parse_value(category, value).map(Self::LicenseType),
            "license_status" => parse_value(category, value).map(Self::LicenseStatus),
            other => Err(AppError::bad_request(format!(
                "Invalid search category: {other}"
            ))),
        }
    }
}

fn parse_value<'de, T: Deserialize<'de>>(category: &str, value: &'de str) -> AppResult<T> {
    let de: StrDeserializer<'de, ValueError> = value.into_deserializer();
    T::deserialize(de).map_err(|_| {
        AppError::bad_request(format!(
            "Invalid search value '{value}' for category '{category}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sam_core::error::ErrorKind;
    use sam_core::types::LicenseId;

    use super::*;

    fn license(software: i64, license_type: LicenseType) -> SoftwareLicense {
        let now = Utc::now();
        SoftwareLicense {
            license_id: LicenseId::new(1),
            software_info_id: SoftwareInfoId::new(software),
            license_type,
            license_status: LicenseStatus::Available,
            license_key: None,
            license_expired_date: None,
            lv_limit: None,
            remark: None,
            create_time: now,
            last_update_time: now,
        }
    }

    fn info(id: i64, name: &str, kind: SoftwareType) -> SoftwareInfo {
        SoftwareInfo {
            software_info_id: SoftwareInfoId::new(id),
            software_info_name: name.to_string(),
            software_info_type: kind,
            software_info_match_rule: None,
        }
    }

    #[test]
    fn test_parse_categories() {
        assert_eq!(
            LicenseSearch::parse("software_name", "Visual").unwrap(),
            LicenseSearch::SoftwareName("Visual".into())
        );
        assert_eq!(
            LicenseSearch::parse("software_type", "design").unwrap(),
            LicenseSearch::SoftwareType(SoftwareType::Design)
        );
        assert_eq!(
            LicenseSearch::parse("license_status", "in_use").unwrap(),
            LicenseSearch::LicenseStatus(LicenseStatus::InUse)
        );

        let bad_value = LicenseSearch::parse("license_type", "weekly").unwrap_err();
        assert_eq!(bad_value.kind, ErrorKind::BadRequest);
        let bad_category = LicenseSearch::parse("vendor", "x").unwrap_err();
        assert_eq!(bad_category.kind, ErrorKind::BadRequest);
    }

    #[test]
    fn test_narrowed_detects_contradiction() {
        let filter = LicenseFilter {
            license_type: Some(LicenseType::Monthly),
            ..Default::default()
        };
        assert!(filter
            .clone()
            .narrowed(LicenseSearch::LicenseType(LicenseType::Annual))
            .is_none());
        assert_eq!(
            filter
                .clone()
                .narrowed(LicenseSearch::LicenseType(LicenseType::Monthly)),
            Some(filter.clone())
        );

        let with_name = filter
            .narrowed(LicenseSearch::SoftwareName("cad".into()))
            .unwrap();
        assert_eq!(with_name.software_name.as_deref(), Some("cad"));
    }

    #[test]
    fn test_matches_joins_catalog_fields() {
        let studio = info(1, "Visual Studio", SoftwareType::Development);
        let lic = license(1, LicenseType::Annual);

        let by_name = LicenseFilter {
            software_name: Some("STUDIO".into()),
            ..Default::default()
        };
        assert!(by_name.matches(&lic, Some(&studio)));
        assert!(!by_name.matches(&lic, None));

        let by_type = LicenseFilter {
            software_type: Some(SoftwareType::Design),
            ..Default::default()
        };
        assert!(!by_type.matches(&lic, Some(&studio)));

        assert!(LicenseFilter::default().matches(&lic, None));
    }

    #[test]
    fn test_catalog_entry_is_inlined() {
        let row = LicenseWithInfo {
            license: license(1, LicenseType::Perpetual),
            software_info: Some(info(1, "Visual Studio", SoftwareType::Development)),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["LicenseID"], 1);
        assert_eq!(json["LicenseType"], "perpetual");
        assert_eq!(json["software_info"]["SoftwareInfoName"], "Visual Studio");
    }
}
