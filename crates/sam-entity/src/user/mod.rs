//! User account entities.

pub mod model;
pub mod permission;
pub mod status;

pub use model::{CreateUser, User};
pub use permission::Permission;
pub use status::AccountStatus;
