//! Service layer orchestrating database mutations with the audit trail.
//!
//! `LqaService` wraps `LqaDb` (raw database access). All repo methods are
//! implemented as `impl LqaService` in `repos/`.

use crate::LqaDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with audit entries.
///
/// Every mutation method follows this protocol:
/// 1. Begin transaction (for multi-statement mutations)
/// 2. Execute SQL, with a guard predicate where the write is conditional
/// 3. Append audit entry
/// 4. Commit transaction
pub struct LqaService {
    db: LqaDb,
}

impl LqaService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = LqaDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `LqaDb`.
    #[must_use]
    pub const fn from_db(db: LqaDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LqaDb {
        &self.db
    }
}
