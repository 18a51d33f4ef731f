//! # sam-service
//!
//! Business logic for the software asset manager. Services receive their
//! stores and helpers as `Arc`s at construction time and hold no other
//! shared state.

pub mod account;
pub mod context;
pub mod lifecycle;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{AccountService, NewAccount, Profile};
pub use context::RequestContext;
pub use lifecycle::{LicenseLifecycleManager, RenewTarget};
pub use reports::{DashboardService, LicenseCatalogService, UsageHistoryService};
