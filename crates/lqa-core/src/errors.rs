//! Cross-cutting error types.
//!
//! Domain-specific errors (`DatabaseError`, `ReviewError`) are defined in
//! their respective crates. `CoreError` covers what the pure types in this
//! crate can reject on their own: validation of new records and settings.

use thiserror::Error;

/// Errors raised by the pure types in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (ranges, required fields, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
