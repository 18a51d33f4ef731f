//! Software catalog entry model.

use sam_core::types::SoftwareInfoId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category of a cataloged software product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "software_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SoftwareType {
    /// Operating system.
    Os,
    /// Office suite.
    Office,
    /// Development tooling.
    Development,
    /// Design and media.
    Design,
    /// Streaming services.
    Streaming,
    /// Anything else.
    Other,
}

/// A software product that licenses are issued for.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SoftwareInfo {
    #[serde(rename = "SoftwareInfoID")]
    pub software_info_id: SoftwareInfoId,
    #[serde(rename = "SoftwareInfoName")]
    pub software_info_name: String,
    #[serde(rename = "SoftwareInfoType")]
    pub software_info_type: SoftwareType,
    /// Pattern used to match installed software against this entry.
    #[serde(rename = "SoftwareInfoMatchRule")]
    pub software_info_match_rule: Option<String>,
}
