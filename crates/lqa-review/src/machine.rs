//! Report transition guards.
//!
//! `plan_transition` decides whether an action is allowed and which derived
//! fields it sets, without touching the store. Guards run in a fixed order:
//! caller role, then required input, then source status against
//! [`ReportStatus::next_for`](lqa_core::enums::ReportStatus::next_for).

use chrono::{DateTime, Duration, Utc};

use lqa_core::entities::{QualityReport, QualitySettings};
use lqa_core::enums::{ReportAction, UserRole};
use lqa_core::identity::Actor;
use lqa_db::updates::report::ReportTransition;

use crate::error::ReviewError;

/// Check that `actor` may perform `action` at all.
///
/// # Errors
///
/// Returns `ReviewError::Permission` for manager-only actions attempted by
/// other roles, and for `auto_accept` attempted by anyone but the system.
pub fn authorize(action: ReportAction, actor: &Actor) -> Result<(), ReviewError> {
    let allowed = match action {
        ReportAction::AutoAccept => actor.role == UserRole::System,
        a if a.requires_manager() => actor.is_manager(),
        _ => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(ReviewError::Permission {
            action: action.to_string(),
            role: actor.role.to_string(),
        })
    }
}

/// Trimmed comment, or `None` when absent or blank.
fn non_blank(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

/// Plan `action` on `report` as of `now`.
///
/// `comment` is required for `dispute` and optional for `finalize`; other
/// actions ignore it.
///
/// # Errors
///
/// Returns `ReviewError::Permission`, `ReviewError::Validation` for a blank
/// dispute comment (whatever the status) or an unrepresentable review
/// deadline, or `ReviewError::InvalidState` when
/// the transition table has no edge for this action from the current status.
pub fn plan_transition(
    report: &QualityReport,
    action: ReportAction,
    actor: &Actor,
    comment: Option<&str>,
    settings: &QualitySettings,
    now: DateTime<Utc>,
) -> Result<ReportTransition, ReviewError> {
    authorize(action, actor)?;

    let comment = non_blank(comment);
    if action == ReportAction::Dispute && comment.is_none() {
        return Err(ReviewError::Validation(
            "a dispute requires a non-empty comment".into(),
        ));
    }

    let to = report.status.next_for(action).ok_or_else(|| {
        if report.status.is_terminal() {
            ReviewError::InvalidState(format!(
                "report {} is already {} and accepts no further actions",
                report.id, report.status
            ))
        } else {
            ReviewError::InvalidState(format!(
                "report {} cannot {action} from {}",
                report.id, report.status
            ))
        }
    })?;

    let mut plan = ReportTransition::new(action, report.status, to, report.version);
    match action {
        ReportAction::SubmitForReview => {
            let deadline = now
                .checked_add_signed(Duration::days(i64::from(settings.dispute_period_days)))
                .ok_or_else(|| {
                    ReviewError::Validation(format!(
                        "dispute_period_days {} puts the review deadline out of range",
                        settings.dispute_period_days
                    ))
                })?;
            plan.submission_date = Some(now);
            plan.review_deadline = Some(deadline);
        }
        ReportAction::Accept | ReportAction::AutoAccept => {
            plan.finalization_date = Some(now);
        }
        ReportAction::Dispute => {
            plan.translator_comments = comment;
        }
        ReportAction::BeginFinalReview => {}
        ReportAction::Finalize => {
            plan.finalization_date = Some(now);
            plan.final_reviewer_comments = comment;
        }
    }
    Ok(plan)
}
