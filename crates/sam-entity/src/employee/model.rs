//! Employee entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::EmployeeStatus;

/// Highest job level an employee can hold.
pub const MAX_LEVEL: i16 = 5;

/// Recorded gender of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Other or unspecified.
    Other,
    /// Male.
    Male,
    /// Female.
    Female,
}

/// An employee, keyed by their job number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Job number, e.g. `"E1001"`.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Recorded gender.
    pub gender: Gender,
    /// Department name.
    pub department: Option<String>,
    /// Job level, `0..=5`. Compared against a license's `LvLimit`.
    pub level: i16,
    /// Employment status.
    pub status: EmployeeStatus,
}

/// Data required to register an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub name: String,
    pub gender: Gender,
    pub department: Option<String>,
    pub level: i16,
}

impl NewEmployee {
    /// Materialize the row as it will be stored.
    pub fn into_employee(self) -> Employee {
        Employee {
            employee_id: self.employee_id,
            name: self.name,
            gender: self.gender,
            department: self.department,
            level: self.level,
            status: EmployeeStatus::Employed,
        }
    }
}
