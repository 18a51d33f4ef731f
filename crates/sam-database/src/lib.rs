//! # sam-database
//!
//! The persistence layer: store traits consumed by the service layer, a
//! PostgreSQL implementation, an in-memory implementation for tests and
//! single-node demos, connection pool management, and embedded migrations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use postgres::{PgAccountStore, PgLicenseStore};
pub use store::{AccountStore, LicenseStore, LicenseTransaction};
