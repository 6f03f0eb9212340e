use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// The caller of a workflow operation.
///
/// Produced at the boundary (CLI `--as`, or a future HTTP layer) after
/// authentication. Contains only data fields; role checks live in `lqa-review`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// The identity used by scheduled jobs such as the deadline sweep.
    #[must_use]
    pub fn system() -> Self {
        Self::new("system", UserRole::System)
    }

    /// Whether this caller may perform manager-only transitions.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}
