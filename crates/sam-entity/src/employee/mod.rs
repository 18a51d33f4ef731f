//! Employee domain entities.

pub mod model;
pub mod status;

pub use model::{Employee, Gender, MAX_LEVEL, NewEmployee};
pub use status::EmployeeStatus;
