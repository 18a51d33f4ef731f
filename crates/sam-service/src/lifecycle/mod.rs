//! License checkout, return, and renewal.

pub mod manager;

pub use manager::{LicenseLifecycleManager, RenewTarget};
