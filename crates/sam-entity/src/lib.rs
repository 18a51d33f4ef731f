//! # sam-entity
//!
//! Domain entity models for the software asset manager. Every struct in
//! this crate represents a database table row or a domain value object.
//! Table rows derive `sqlx::FromRow`; lifecycle rows serialize with the
//! wire field names clients already use (`LicenseID`, `Return_Time`, ...).

pub mod employee;
pub mod license;
pub mod software;
pub mod usage;
pub mod user;
