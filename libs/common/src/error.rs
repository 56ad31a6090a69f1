//! Custom error types for the common library
//!
//! `CoreError` is the closed set of failures the stores and the token
//! service can report. Handlers map each variant to a transport status;
//! nothing inside a variant is meant for client eyes.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failures surfaced by the stores and the token service
#[derive(Error, Debug)]
pub enum CoreError {
    /// Lookup, update or delete of a record that does not exist
    #[error("record not found")]
    NotFound,

    /// A record with the same unique key already exists
    #[error("record already exists")]
    Conflict,

    /// Token signature, algorithm, issuer or shape did not check out
    #[error("invalid token")]
    InvalidToken,

    /// Token is authentic but its expiry is in the past
    #[error("token has expired")]
    ExpiredToken,

    /// Backend I/O failed; the message is for logs only
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl From<SqlxError> for CoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => CoreError::NotFound,
            SqlxError::Database(ref db_err) if db_err.is_unique_violation() => CoreError::Conflict,
            other => CoreError::Unavailable(other.to_string()),
        }
    }
}

/// Type alias for Result with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Custom error type for database setup
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
