//! Database error types for lqa-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., editing scores of a finalized report).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A conditional update found the row changed since it was read.
    #[error(
        "Conflict: report {id} is no longer {expected_status} at version {expected_version}"
    )]
    Conflict {
        id: String,
        expected_status: String,
        expected_version: i64,
    },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
