//! Report change sets: draft edits and status transitions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lqa_core::entities::LqaErrorEntry;
use lqa_core::enums::{ReportAction, ReportStatus};

/// Edit of a report's content. Status is never writable here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lqa_score: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qs_score: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lqa_errors: Option<Vec<LqaErrorEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_comments: Option<Option<String>>,
}

impl ReportUpdate {
    /// Whether this edit touches the scoring fields, which freeze on finalization.
    #[must_use]
    pub const fn touches_scores(&self) -> bool {
        self.lqa_score.is_some() || self.qs_score.is_some() || self.lqa_errors.is_some()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project_name.is_none()
            && !self.touches_scores()
            && self.reviewer_id.is_none()
            && self.reviewer_comments.is_none()
    }
}

pub struct ReportUpdateBuilder(ReportUpdate);

impl ReportUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ReportUpdate::default())
    }

    #[must_use]
    pub fn project_name(mut self, project_name: impl Into<String>) -> Self {
        self.0.project_name = Some(project_name.into());
        self
    }

    #[must_use]
    pub fn lqa_score(mut self, lqa_score: Option<f64>) -> Self {
        self.0.lqa_score = Some(lqa_score);
        self
    }

    #[must_use]
    pub fn qs_score(mut self, qs_score: Option<f64>) -> Self {
        self.0.qs_score = Some(qs_score);
        self
    }

    #[must_use]
    pub fn lqa_errors(mut self, lqa_errors: Vec<LqaErrorEntry>) -> Self {
        self.0.lqa_errors = Some(lqa_errors);
        self
    }

    #[must_use]
    pub fn reviewer_id(mut self, reviewer_id: Option<String>) -> Self {
        self.0.reviewer_id = Some(reviewer_id);
        self
    }

    #[must_use]
    pub fn reviewer_comments(mut self, reviewer_comments: Option<String>) -> Self {
        self.0.reviewer_comments = Some(reviewer_comments);
        self
    }

    #[must_use]
    pub fn build(self) -> ReportUpdate {
        self.0
    }
}

impl Default for ReportUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A status transition plus the derived fields it sets.
///
/// Applied with a guard on `from` and `expected_version`; see
/// `LqaService::apply_report_transition`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTransition {
    pub action: ReportAction,
    pub from: ReportStatus,
    pub to: ReportStatus,
    pub expected_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalization_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_reviewer_comments: Option<String>,
}

impl ReportTransition {
    /// A bare status change with no derived fields.
    #[must_use]
    pub const fn new(
        action: ReportAction,
        from: ReportStatus,
        to: ReportStatus,
        expected_version: i64,
    ) -> Self {
        Self {
            action,
            from,
            to,
            expected_version,
            submission_date: None,
            review_deadline: None,
            finalization_date: None,
            translator_comments: None,
            final_reviewer_comments: None,
        }
    }

    /// The free-text reason recorded in the audit trail, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.translator_comments
            .as_deref()
            .or(self.final_reviewer_comments.as_deref())
    }
}
