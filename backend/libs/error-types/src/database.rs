//! sqlx error mapping
//!
//! Only uniqueness violations and missing rows are meaningful to callers;
//! every other database failure is internal.

use crate::ServiceError;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ServiceError::not_found("record"),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                tracing::debug!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "Unique constraint violation"
                );
                ServiceError::conflict("resource already exists")
            }
            _ => ServiceError::internal(err),
        }
    }
}
