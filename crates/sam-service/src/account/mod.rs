//! Login, profile, and account administration.

pub mod service;

pub use service::{AccountService, NewAccount, Profile};
