//! Capabilities a route group can require.

pub mod capability;

pub use capability::{Admin, Authenticated, Capability};
