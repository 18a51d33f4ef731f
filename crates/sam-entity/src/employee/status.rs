//! Employment status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Currently employed.
    Employed,
    /// Has left the company.
    Left,
    /// Temporarily suspended.
    Suspended,
}

impl EmployeeStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employed => "employed",
            Self::Left => "left",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = sam_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employed" => Ok(Self::Employed),
            "left" => Ok(Self::Left),
            "suspended" => Ok(Self::Suspended),
            _ => Err(sam_core::AppError::validation(format!(
                "Invalid employee status: '{s}'. Expected one of: employed, left, suspended"
            ))),
        }
    }
}
