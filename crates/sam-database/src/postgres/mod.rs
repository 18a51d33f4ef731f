//! PostgreSQL-backed stores.

mod account;
mod license;

pub use account::PgAccountStore;
pub use license::{PgLicenseStore, PgLicenseTransaction};

use sam_core::error::{AppError, ErrorKind};

/// Map a failed write, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(
    e: sqlx::Error,
    context: &'static str,
    conflict_message: &'static str,
) -> AppError {
    let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, conflict_message, e)
    } else {
        AppError::with_source(ErrorKind::Database, context, e)
    }
}
