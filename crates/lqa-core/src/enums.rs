//! Status enums, roles, severities, actions, and entity types.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `ReportStatus::next_for` is the single report transition table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ReportType
// ---------------------------------------------------------------------------

/// Kind of quality review a report records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Structured linguistic-quality assessment, scored 0-100.
    Lqa,
    /// Holistic quality score, rated 0-5.
    Qs,
    /// Both an LQA score and a QS rating.
    Combined,
}

impl ReportType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lqa => "lqa",
            Self::Qs => "qs",
            Self::Combined => "combined",
        }
    }

    /// Whether reports of this type must carry an LQA score.
    #[must_use]
    pub const fn requires_lqa(self) -> bool {
        matches!(self, Self::Lqa | Self::Combined)
    }

    /// Whether reports of this type must carry a QS rating.
    #[must_use]
    pub const fn requires_qs(self) -> bool {
        matches!(self, Self::Qs | Self::Combined)
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of an error recorded in an LQA review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Preferential,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Preferential => "preferential",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReportAction
// ---------------------------------------------------------------------------

/// An operation that moves a report through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportAction {
    SubmitForReview,
    Accept,
    /// Acceptance applied by the deadline sweep once the review period elapses.
    AutoAccept,
    Dispute,
    BeginFinalReview,
    Finalize,
}

impl ReportAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubmitForReview => "submit_for_review",
            Self::Accept => "accept",
            Self::AutoAccept => "auto_accept",
            Self::Dispute => "dispute",
            Self::BeginFinalReview => "begin_final_review",
            Self::Finalize => "finalize",
        }
    }

    /// Whether only admins and project managers may perform this action.
    #[must_use]
    pub const fn requires_manager(self) -> bool {
        matches!(
            self,
            Self::SubmitForReview | Self::BeginFinalReview | Self::Finalize
        )
    }
}

impl fmt::Display for ReportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReportStatus
// ---------------------------------------------------------------------------

/// Status of a quality report through its review lifecycle.
///
/// ```text
/// draft ─┐
///        ├─ submit_for_review → pending_translator_review ─ accept/auto_accept → translator_accepted
/// submitted ┘                                             └ dispute → translator_disputed
/// translator_disputed ─ begin_final_review → pending_final_review
/// translator_disputed | pending_final_review ─ finalize → finalized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
    PendingTranslatorReview,
    TranslatorAccepted,
    TranslatorDisputed,
    PendingFinalReview,
    Finalized,
}

impl ReportStatus {
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Submitted,
        Self::PendingTranslatorReview,
        Self::TranslatorAccepted,
        Self::TranslatorDisputed,
        Self::PendingFinalReview,
        Self::Finalized,
    ];

    /// The report transition table: the status reached by applying `action`
    /// from `self`, or `None` when the action is not allowed here.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn next_for(self, action: ReportAction) -> Option<Self> {
        use ReportAction as A;
        match (self, action) {
            (Self::Draft | Self::Submitted, A::SubmitForReview) => {
                Some(Self::PendingTranslatorReview)
            }
            (Self::PendingTranslatorReview, A::Accept | A::AutoAccept) => {
                Some(Self::TranslatorAccepted)
            }
            (Self::PendingTranslatorReview, A::Dispute) => Some(Self::TranslatorDisputed),
            (Self::TranslatorDisputed, A::BeginFinalReview) => Some(Self::PendingFinalReview),
            (Self::TranslatorDisputed | Self::PendingFinalReview, A::Finalize) => {
                Some(Self::Finalized)
            }
            _ => None,
        }
    }

    /// Terminal statuses accept no further actions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TranslatorAccepted | Self::Finalized)
    }

    /// Only reports in these statuses contribute to a freelancer's scores.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::TranslatorAccepted | Self::Finalized)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::PendingTranslatorReview => "pending_translator_review",
            Self::TranslatorAccepted => "translator_accepted",
            Self::TranslatorDisputed => "translator_disputed",
            Self::PendingFinalReview => "pending_final_review",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role of an internal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    ProjectManager,
    Reviewer,
    Translator,
    /// Scheduled jobs. Never stored on a user record.
    System,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProjectManager => "project_manager",
            Self::Reviewer => "reviewer",
            Self::Translator => "translator",
            Self::System => "system",
        }
    }

    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Admin | Self::ProjectManager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FreelancerStatus
// ---------------------------------------------------------------------------

/// Engagement status of a freelancer. Read-only to the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FreelancerStatus {
    Active,
    Probation,
    Inactive,
}

impl FreelancerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Probation => "probation",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for FreelancerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    EscalationRaised,
    SettingsChanged,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::EscalationRaised => "escalation_raised",
            Self::SettingsChanged => "settings_changed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Report,
    Freelancer,
    User,
    Settings,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Freelancer => "freelancer",
            Self::User => "user",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
