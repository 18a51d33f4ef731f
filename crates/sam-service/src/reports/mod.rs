//! Read-side views over licenses and usage records.

pub mod catalog;
pub mod dashboard;
pub mod history;

pub use catalog::LicenseCatalogService;
pub use dashboard::DashboardService;
pub use history::UsageHistoryService;
