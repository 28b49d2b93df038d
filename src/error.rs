//! Error types shared across the crate.

use thiserror::Error;

/// Configuration loading/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration '{key}'")]
    Missing { key: String },

    #[error("invalid configuration '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence-layer failures.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database query failed: {0}")]
    Query(String),

    #[error("database migration failed: {0}")]
    Migration(String),

    #[error("row decode failed: {0}")]
    Serialization(String),
}

#[cfg(feature = "libsql")]
impl From<libsql::Error> for DatabaseError {
    fn from(err: libsql::Error) -> Self {
        DatabaseError::Query(err.to_string())
    }
}

/// HTTP server startup failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server startup failed: {reason}")]
    StartupFailed { reason: String },
}
