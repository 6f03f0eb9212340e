//! Review workflow error types.

use lqa_db::error::DatabaseError;
use thiserror::Error;

/// Errors surfaced by workflow operations.
///
/// No variant implies a partial write: every failure leaves the report as it
/// was before the call.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The caller's role may not perform this action.
    #[error("Permission denied: {role} cannot {action}")]
    Permission { action: String, role: String },

    /// The action is not allowed from the report's current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced report, freelancer, or user does not exist.
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The report changed between read and write.
    #[error("Conflict: report {id} was changed concurrently, reload and retry")]
    Conflict { id: String },

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ReviewError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NoResult => Self::NotFound {
                entity_type: "record".into(),
                id: String::new(),
            },
            DatabaseError::Conflict { id, .. } => Self::Conflict { id },
            DatabaseError::InvalidState(msg) => Self::InvalidState(msg),
            other => Self::Database(other),
        }
    }
}

/// Attach the entity being looked up to a missing-row error.
pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, entity_type: &str, id: &str) -> Result<T, ReviewError>;
}

impl<T> OrNotFound<T> for Result<T, DatabaseError> {
    fn or_not_found(self, entity_type: &str, id: &str) -> Result<T, ReviewError> {
        self.map_err(|e| match e {
            DatabaseError::NoResult => ReviewError::NotFound {
                entity_type: entity_type.to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_conflict() {
        let err: ReviewError = DatabaseError::Conflict {
            id: "rpt-00000001".into(),
            expected_status: "pending_translator_review".into(),
            expected_version: 2,
        }
        .into();
        assert!(matches!(err, ReviewError::Conflict { ref id } if id == "rpt-00000001"));
    }

    #[test]
    fn missing_row_names_the_entity() {
        let result: Result<(), DatabaseError> = Err(DatabaseError::NoResult);
        let err = result.or_not_found("report", "rpt-missing0").unwrap_err();
        assert_eq!(err.to_string(), "Not found: report rpt-missing0");
    }
}
