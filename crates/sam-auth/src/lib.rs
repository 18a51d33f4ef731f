//! # sam-auth
//!
//! Authentication and authorization building blocks.
//!
//! ## Modules
//!
//! - `jwt`: access token issuance and validation
//! - `password`: Argon2id hashing and password policy
//! - `rbac`: capabilities that route groups can require

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Admin, Authenticated, Capability};
