//! Report lifecycle integration tests
//!
//! - Role guard on submission leaves the report untouched
//! - Accept twice, dispute validation, finalize with notifications
//! - A transition planned on a stale read loses with a conflict
//! - Failed notification delivery never fails the transition

mod common;

use std::sync::Arc;

use chrono::Duration;
use pretty_assertions::assert_eq;

use common::{FailingDispatcher, Fixture, RecordingDispatcher};
use lqa_core::entities::QualitySettings;
use lqa_core::enums::{AuditAction, ReportAction, ReportStatus, UserRole};
use lqa_core::identity::Actor;
use lqa_db::repos::audit::AuditFilter;
use lqa_db::updates::report::ReportUpdateBuilder;
use lqa_review::ReviewError;
use lqa_review::machine::plan_transition;

#[tokio::test]
async fn submit_by_reviewer_is_denied_and_changes_nothing() {
    let fx = Fixture::new().await;
    let report = fx
        .engine
        .create_report(&fx.pm_actor(), &fx.draft(Some(90.0), None))
        .await
        .unwrap();

    let reviewer = Actor::new(&fx.reviewer.id, UserRole::Reviewer);
    let result = fx.engine.submit_for_review(&reviewer, &report.id).await;
    assert!(matches!(result, Err(ReviewError::Permission { .. })));

    let stored = fx.engine.get_report(&report.id).await.unwrap();
    assert_eq!(stored.status, ReportStatus::Draft);
    assert_eq!(stored.version, report.version);
    assert!(fx.outbox.sent().is_empty());
}

#[tokio::test]
async fn submit_sets_deadline_and_notifies_freelancer() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(82.0), Some(4.0)).await;

    assert_eq!(report.status, ReportStatus::PendingTranslatorReview);
    let submitted = report.submission_date.unwrap();
    assert_eq!(report.review_deadline, Some(submitted + Duration::days(7)));

    let sent = fx.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, fx.freelancer.email);
    assert!(sent[0].body.contains("LQA score: 82.00"));
}

#[tokio::test]
async fn active_settings_override_fallback_deadline() {
    let fx = Fixture::new().await;
    fx.engine
        .service()
        .set_active_settings(
            Some(&fx.admin.id),
            QualitySettings {
                dispute_period_days: 3,
                ..QualitySettings::default()
            },
        )
        .await
        .unwrap();

    let report = fx.pending_report(Some(82.0), None).await;
    let submitted = report.submission_date.unwrap();
    assert_eq!(report.review_deadline, Some(submitted + Duration::days(3)));
}

#[tokio::test]
async fn accept_twice_fails_second_time() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(88.0), None).await;

    let first = fx
        .engine
        .accept(&fx.translator_actor(), &report.id)
        .await
        .unwrap();
    assert_eq!(first.report.status, ReportStatus::TranslatorAccepted);
    assert!(first.report.finalization_date.is_some());

    let second = fx.engine.accept(&fx.translator_actor(), &report.id).await;
    assert!(matches!(second, Err(ReviewError::InvalidState(_))));

    let stored = fx.engine.get_report(&report.id).await.unwrap();
    assert_eq!(stored, first.report);
}

#[tokio::test]
async fn blank_dispute_is_rejected_without_change() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(70.0), None).await;

    let result = fx
        .engine
        .dispute(&fx.translator_actor(), &report.id, "   ")
        .await;
    assert!(matches!(result, Err(ReviewError::Validation(_))));
    assert_eq!(
        fx.engine.get_report(&report.id).await.unwrap().status,
        ReportStatus::PendingTranslatorReview
    );
}

#[tokio::test]
async fn dispute_notifies_managers_and_reviewer_then_finalize_notifies_freelancer() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(64.0), None).await;
    fx.outbox.clear();

    let disputed = fx
        .engine
        .dispute(
            &fx.translator_actor(),
            &report.id,
            "The flagged terms come from the client glossary",
        )
        .await
        .unwrap();
    assert_eq!(disputed.report.status, ReportStatus::TranslatorDisputed);
    assert_eq!(disputed.dispatch.sent, 3);

    let mut recipients: Vec<String> = fx.outbox.sent().into_iter().map(|n| n.to).collect();
    recipients.sort();
    assert_eq!(
        recipients,
        vec!["alex@example.com", "pat@example.com", "rui@example.com"]
    );
    fx.outbox.clear();

    // Scores may still be corrected while the dispute is open.
    fx.engine
        .update_report(
            &fx.pm_actor(),
            &report.id,
            &ReportUpdateBuilder::new().lqa_score(Some(71.0)).build(),
        )
        .await
        .unwrap();

    let in_review = fx
        .engine
        .begin_final_review(&fx.pm_actor(), &report.id)
        .await
        .unwrap();
    assert_eq!(in_review.report.status, ReportStatus::PendingFinalReview);

    let finalized = fx
        .engine
        .finalize(&fx.pm_actor(), &report.id, Some("Glossary terms accepted"))
        .await
        .unwrap();
    assert_eq!(finalized.report.status, ReportStatus::Finalized);
    assert_eq!(finalized.report.lqa_score, Some(71.0));

    let sent = fx.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, fx.freelancer.email);
    assert!(sent[0].body.contains("Glossary terms accepted"));

    let frozen = fx
        .engine
        .update_report(
            &fx.pm_actor(),
            &report.id,
            &ReportUpdateBuilder::new().lqa_score(Some(99.0)).build(),
        )
        .await;
    assert!(matches!(frozen, Err(ReviewError::InvalidState(_))));

    let audit = fx
        .engine
        .service()
        .query_audit(&AuditFilter {
            entity_id: Some(report.id.clone()),
            action: Some(AuditAction::StatusChanged),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(audit.len(), 4);
}

#[tokio::test]
async fn finalize_requires_manager() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(64.0), None).await;
    fx.engine
        .dispute(&fx.translator_actor(), &report.id, "Disagree")
        .await
        .unwrap();

    let result = fx
        .engine
        .finalize(&fx.translator_actor(), &report.id, None)
        .await;
    assert!(matches!(result, Err(ReviewError::Permission { .. })));
    assert_eq!(
        fx.engine.get_report(&report.id).await.unwrap().status,
        ReportStatus::TranslatorDisputed
    );
}

#[tokio::test]
async fn stale_plan_loses_to_committed_transition() {
    let fx = Fixture::new().await;
    let report = fx.pending_report(Some(75.0), None).await;

    // Both callers read the report while it awaited the translator.
    let stale_dispute = plan_transition(
        &report,
        ReportAction::Dispute,
        &fx.translator_actor(),
        Some("Late objection"),
        &QualitySettings::default(),
        lqa_db::helpers::now(),
    )
    .unwrap();

    fx.engine
        .accept(&fx.translator_actor(), &report.id)
        .await
        .unwrap();

    let lost = fx
        .engine
        .service()
        .apply_report_transition(Some(&fx.freelancer.id), &report.id, &stale_dispute)
        .await
        .map_err(ReviewError::from);
    assert!(matches!(lost, Err(ReviewError::Conflict { .. })));

    let stored = fx.engine.get_report(&report.id).await.unwrap();
    assert_eq!(stored.status, ReportStatus::TranslatorAccepted);
    assert_eq!(stored.translator_comments, None);
}

#[tokio::test]
async fn failed_delivery_does_not_fail_transition() {
    let recorder = Arc::new(RecordingDispatcher::default());
    let fx = Fixture::with_dispatcher(Arc::new(FailingDispatcher), recorder).await;
    let report = fx
        .engine
        .create_report(&fx.pm_actor(), &fx.draft(Some(90.0), None))
        .await
        .unwrap();

    let outcome = fx
        .engine
        .submit_for_review(&fx.pm_actor(), &report.id)
        .await
        .unwrap();
    assert_eq!(outcome.report.status, ReportStatus::PendingTranslatorReview);
    assert_eq!(outcome.dispatch.sent, 0);
    assert_eq!(outcome.dispatch.failed, 1);
    assert_eq!(outcome.notifications.len(), 1);
}

#[tokio::test]
async fn missing_report_is_not_found() {
    let fx = Fixture::new().await;
    let result = fx.engine.accept(&fx.translator_actor(), "rpt-missing0").await;
    assert!(matches!(
        result,
        Err(ReviewError::NotFound { ref entity_type, .. }) if entity_type == "report"
    ));
}

#[tokio::test]
async fn create_report_validates_input() {
    let fx = Fixture::new().await;
    let bad = fx.engine.create_report(&fx.pm_actor(), &fx.draft(Some(140.0), None)).await;
    assert!(matches!(bad, Err(ReviewError::Validation(_))));

    let mut orphan = fx.draft(Some(80.0), None);
    orphan.freelancer_id = "frl-missing0".into();
    let missing = fx.engine.create_report(&fx.pm_actor(), &orphan).await;
    assert!(matches!(missing, Err(ReviewError::NotFound { .. })));
}

#[tokio::test]
async fn edit_cannot_clear_a_score_the_type_requires() {
    let fx = Fixture::new().await;
    let report = fx
        .engine
        .create_report(&fx.pm_actor(), &fx.draft(Some(80.0), Some(4.0)))
        .await
        .unwrap();

    let clear_lqa = ReportUpdateBuilder::new().lqa_score(None).build();
    let result = fx.engine.update_report(&fx.pm_actor(), &report.id, &clear_lqa).await;
    assert!(matches!(result, Err(ReviewError::Validation(_))));

    let clear_qs = ReportUpdateBuilder::new().qs_score(None).build();
    let result = fx.engine.update_report(&fx.pm_actor(), &report.id, &clear_qs).await;
    assert!(matches!(result, Err(ReviewError::Validation(_))));

    let unchanged = fx.engine.get_report(&report.id).await.unwrap();
    assert_eq!(unchanged.lqa_score, Some(80.0));
    assert_eq!(unchanged.qs_score, Some(4.0));
    assert_eq!(unchanged.version, report.version);

    let rescore = ReportUpdateBuilder::new().lqa_score(Some(72.5)).build();
    let updated = fx
        .engine
        .update_report(&fx.pm_actor(), &report.id, &rescore)
        .await
        .unwrap();
    assert_eq!(updated.lqa_score, Some(72.5));
    assert_eq!(updated.qs_score, Some(4.0));
}
