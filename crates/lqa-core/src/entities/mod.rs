//! Entity structs for all lqa domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `lqa-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod audit;
mod freelancer;
mod report;
mod settings;
mod user;

pub use audit::AuditEntry;
pub use freelancer::Freelancer;
pub use report::{
    LQA_MAX, LqaErrorEntry, NewQualityReport, QS_MAX, QualityReport, validate_required_scores,
    validate_scores,
};
pub use settings::{MAX_DISPUTE_PERIOD_DAYS, QualitySettings, SettingsRecord};
pub use user::User;
