//! License usage records.

pub mod model;
pub mod summary;

pub use model::{NewUsageRecord, UsageRecord};
pub use summary::UsageSummary;
