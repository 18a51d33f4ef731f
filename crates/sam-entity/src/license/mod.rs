//! Software license entities.

pub mod catalog;
pub mod model;
pub mod status;

pub use catalog::{LicenseFilter, LicenseSearch, LicenseWithInfo};
pub use model::{LicenseType, SoftwareLicense};
pub use status::LicenseStatus;
