use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ReportStatus, ReportType, Severity};
use crate::errors::CoreError;

/// Upper bound of the LQA scale.
pub const LQA_MAX: f64 = 100.0;
/// Upper bound of the QS scale.
pub const QS_MAX: f64 = 5.0;

/// One error category found during an LQA review.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LqaErrorEntry {
    pub error_type: String,
    pub severity: Severity,
    pub count: u32,
}

/// A quality review of one freelancer's work on one project.
///
/// Owned and mutated exclusively by the review workflow. `version` is bumped on
/// every write and guards status transitions against concurrent updates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QualityReport {
    pub id: String,
    pub freelancer_id: String,
    pub project_name: String,
    pub report_type: ReportType,
    /// 0-100 linguistic-quality score.
    pub lqa_score: Option<f64>,
    /// 0-5 holistic quality rating.
    pub qs_score: Option<f64>,
    pub lqa_errors: Vec<LqaErrorEntry>,
    pub status: ReportStatus,
    pub reviewer_id: Option<String>,
    pub reviewer_comments: Option<String>,
    pub translator_comments: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub review_deadline: Option<DateTime<Utc>>,
    pub finalization_date: Option<DateTime<Utc>>,
    pub final_reviewer_comments: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a draft report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewQualityReport {
    pub freelancer_id: String,
    pub project_name: String,
    pub report_type: ReportType,
    pub lqa_score: Option<f64>,
    pub qs_score: Option<f64>,
    #[serde(default)]
    pub lqa_errors: Vec<LqaErrorEntry>,
    pub reviewer_id: Option<String>,
    pub reviewer_comments: Option<String>,
}

impl NewQualityReport {
    /// Check score ranges, error counts, and that the scores match the report type.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_name.trim().is_empty() {
            return Err(CoreError::Validation("project_name must not be blank".into()));
        }
        validate_scores(self.lqa_score, self.qs_score, &self.lqa_errors)?;
        validate_required_scores(self.report_type, self.lqa_score, self.qs_score)
    }
}

/// Check that the scores a report type needs are present.
///
/// Applied on creation and again to the merged result of every edit.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the missing score.
pub fn validate_required_scores(
    report_type: ReportType,
    lqa_score: Option<f64>,
    qs_score: Option<f64>,
) -> Result<(), CoreError> {
    if report_type.requires_lqa() && lqa_score.is_none() {
        return Err(CoreError::Validation(format!(
            "{report_type} report requires an lqa_score"
        )));
    }
    if report_type.requires_qs() && qs_score.is_none() {
        return Err(CoreError::Validation(format!(
            "{report_type} report requires a qs_score"
        )));
    }
    Ok(())
}

/// Range checks shared by report creation and draft edits.
///
/// # Errors
///
/// Returns `CoreError::Validation` if a score is out of range or an error entry
/// has a zero count or blank type.
pub fn validate_scores(
    lqa_score: Option<f64>,
    qs_score: Option<f64>,
    lqa_errors: &[LqaErrorEntry],
) -> Result<(), CoreError> {
    if let Some(lqa) = lqa_score.filter(|v| !(0.0..=LQA_MAX).contains(v)) {
        return Err(CoreError::Validation(format!(
            "lqa_score must be within 0-100, got {lqa}"
        )));
    }
    if let Some(qs) = qs_score.filter(|v| !(0.0..=QS_MAX).contains(v)) {
        return Err(CoreError::Validation(format!(
            "qs_score must be within 0-5, got {qs}"
        )));
    }
    for entry in lqa_errors {
        if entry.count == 0 {
            return Err(CoreError::Validation(format!(
                "error '{}' must have a count of at least 1",
                entry.error_type
            )));
        }
        if entry.error_type.trim().is_empty() {
            return Err(CoreError::Validation("error_type must not be blank".into()));
        }
    }
    Ok(())
}
