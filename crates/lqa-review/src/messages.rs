//! Notification text for each workflow event.

use chrono::{DateTime, Utc};

use lqa_core::entities::{Freelancer, QualityReport, User};

use crate::notify::NotificationIntent;

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn scores_block(report: &QualityReport) -> String {
    format!(
        "LQA score: {}\nQS score: {}\nErrors recorded: {}",
        score(report.lqa_score),
        score(report.qs_score),
        report.lqa_errors.iter().map(|e| e.count).sum::<u32>()
    )
}

/// Sent to the freelancer when a report is submitted for their review.
#[must_use]
pub fn review_requested(
    freelancer: &Freelancer,
    report: &QualityReport,
    deadline: DateTime<Utc>,
) -> NotificationIntent {
    NotificationIntent::new(
        &freelancer.email,
        format!("Quality report ready for review: {}", report.project_name),
        format!(
            "Hello {},\n\nA {} quality report for {} is ready for your review.\n\n{}\n\n\
             Please accept or dispute it by {}. If you take no action by then, \
             the report is accepted automatically.",
            freelancer.full_name,
            report.report_type,
            report.project_name,
            scores_block(report),
            date(deadline)
        ),
    )
}

/// Sent to managers and the original reviewer when a translator disputes.
#[must_use]
pub fn dispute_raised(
    recipient: &User,
    freelancer: &Freelancer,
    report: &QualityReport,
) -> NotificationIntent {
    NotificationIntent::new(
        &recipient.email,
        format!("Quality report disputed: {}", report.project_name),
        format!(
            "Hello {},\n\n{} disputed the quality report {} for {}.\n\n{}\n\n\
             Translator comments:\n{}\n\nPlease review the dispute and finalize the report.",
            recipient.full_name,
            freelancer.full_name,
            report.id,
            report.project_name,
            scores_block(report),
            report.translator_comments.as_deref().unwrap_or_default()
        ),
    )
}

/// Sent to the freelancer when a disputed report is finalized.
#[must_use]
pub fn decision_made(freelancer: &Freelancer, report: &QualityReport) -> NotificationIntent {
    let comments = report
        .final_reviewer_comments
        .as_deref()
        .map_or_else(String::new, |c| format!("\n\nReviewer decision:\n{c}"));
    NotificationIntent::new(
        &freelancer.email,
        format!("Quality report finalized: {}", report.project_name),
        format!(
            "Hello {},\n\nYour dispute of the quality report for {} has been reviewed \
             and the report is now final.\n\n{}{}",
            freelancer.full_name,
            report.project_name,
            scores_block(report),
            comments
        ),
    )
}

/// Sent to the freelancer when the review period lapses without a response.
#[must_use]
pub fn auto_accepted(freelancer: &Freelancer, report: &QualityReport) -> NotificationIntent {
    NotificationIntent::new(
        &freelancer.email,
        format!("Quality report accepted: {}", report.project_name),
        format!(
            "Hello {},\n\nThe review period for the quality report on {} ended without a \
             response, so the report has been accepted automatically.\n\n{}",
            freelancer.full_name,
            report.project_name,
            scores_block(report)
        ),
    )
}

/// Improvement guidance for a freelancer whose combined score is below threshold.
#[must_use]
pub fn improvement_guidance(
    freelancer: &Freelancer,
    combined: f64,
    threshold: f64,
) -> NotificationIntent {
    NotificationIntent::new(
        &freelancer.email,
        "Quality score below target",
        format!(
            "Hello {},\n\nYour combined quality score is {combined:.2}, below the target of \
             {threshold:.2}.\n\nPlease review the feedback on your recent reports, revisit the \
             project style guides and glossaries, and reach out to your project manager if you \
             would like support.",
            freelancer.full_name
        ),
    )
}

/// Escalation notice to an admin about a freelancer below threshold.
#[must_use]
pub fn admin_escalation(
    admin: &User,
    freelancer: &Freelancer,
    combined: f64,
    threshold: f64,
) -> NotificationIntent {
    NotificationIntent::new(
        &admin.email,
        format!("Quality escalation: {}", freelancer.full_name),
        format!(
            "Hello {},\n\n{} ({}) has a combined quality score of {combined:.2}, below the \
             probation threshold of {threshold:.2}.\n\nConsider whether probation is warranted.",
            admin.full_name, freelancer.full_name, freelancer.email
        ),
    )
}

/// Urgent notice after several consecutive low LQA scores.
#[must_use]
pub fn consecutive_low_lqa(freelancer: &Freelancer, scores: &[f64]) -> NotificationIntent {
    let listed = scores
        .iter()
        .map(|s| format!("{s:.2}"))
        .collect::<Vec<_>>()
        .join(", ");
    NotificationIntent::new(
        &freelancer.email,
        "Urgent: consecutive low LQA scores",
        format!(
            "Hello {},\n\nYour last {} LQA scores were {listed}, all below 70.\n\n\
             Please contact your project manager as soon as possible to agree on an \
             improvement plan.",
            freelancer.full_name,
            scores.len()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lqa_core::entities::LqaErrorEntry;
    use lqa_core::enums::{FreelancerStatus, ReportStatus, ReportType, Severity};

    fn freelancer() -> Freelancer {
        Freelancer {
            id: "frl-00000001".into(),
            full_name: "Ines Duarte".into(),
            email: "ines@example.com".into(),
            status: FreelancerStatus::Active,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn report() -> QualityReport {
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        QualityReport {
            id: "rpt-00000001".into(),
            freelancer_id: "frl-00000001".into(),
            project_name: "Onboarding emails".into(),
            report_type: ReportType::Combined,
            lqa_score: Some(78.5),
            qs_score: None,
            lqa_errors: vec![
                LqaErrorEntry {
                    error_type: "Grammar".into(),
                    severity: Severity::Minor,
                    count: 2,
                },
                LqaErrorEntry {
                    error_type: "Accuracy".into(),
                    severity: Severity::Major,
                    count: 1,
                },
            ],
            status: ReportStatus::PendingTranslatorReview,
            reviewer_id: None,
            reviewer_comments: None,
            translator_comments: None,
            submission_date: Some(at),
            review_deadline: None,
            finalization_date: None,
            final_reviewer_comments: None,
            version: 2,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn review_request_carries_scores_and_deadline() {
        let deadline = Utc.with_ymd_and_hms(2026, 5, 11, 10, 0, 0).unwrap();
        let msg = review_requested(&freelancer(), &report(), deadline);
        assert_eq!(msg.to, "ines@example.com");
        assert!(msg.body.contains("LQA score: 78.50"));
        assert!(msg.body.contains("QS score: n/a"));
        assert!(msg.body.contains("Errors recorded: 3"));
        assert!(msg.body.contains("2026-05-11 10:00 UTC"));
        assert!(msg.body.contains("accepted automatically"));
    }

    #[test]
    fn low_lqa_lists_scores() {
        let msg = consecutive_low_lqa(&freelancer(), &[60.0, 65.0, 62.0]);
        assert!(msg.body.contains("60.00, 65.00, 62.00"));
    }
}
