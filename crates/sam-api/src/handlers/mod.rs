//! HTTP request handlers organized by domain.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod usage;
pub mod user;
