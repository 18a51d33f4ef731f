//! Software catalog entities.

pub mod model;

pub use model::{SoftwareInfo, SoftwareType};
