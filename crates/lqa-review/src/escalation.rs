//! Threshold-driven escalation over a freelancer's eligible reports.
//!
//! Two independent rules, evaluated only once at least
//! [`MIN_ELIGIBLE_REPORTS`] eligible reports exist:
//!
//! - combined score below `probation_threshold` warns the freelancer and
//!   every admin;
//! - the last [`LOW_LQA_WINDOW`] LQA scores all below [`LOW_LQA_THRESHOLD`]
//!   sends the freelancer an urgent notice.
//!
//! Nothing is deduplicated: checking an unchanged history again raises the
//! same events again.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lqa_core::audit_detail::EscalationDetail;
use lqa_core::entities::{Freelancer, QualityReport, QualitySettings, User};
use lqa_core::enums::UserRole;
use lqa_core::identity::Actor;
use lqa_core::scoring;

use crate::error::{OrNotFound, ReviewError};
use crate::messages;
use crate::notify::{DispatchSummary, NotificationIntent, dispatch_all};
use crate::workflow::ReviewEngine;

/// Fewer eligible reports than this is too small a sample to act on.
pub const MIN_ELIGIBLE_REPORTS: usize = 3;
/// LQA score below which a report counts as low.
pub const LOW_LQA_THRESHOLD: f64 = 70.0;
/// Number of most recent LQA scores inspected for a low streak.
pub const LOW_LQA_WINDOW: usize = 3;

/// A policy threshold crossed by a freelancer's history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EscalationEvent {
    FreelancerWarning { freelancer_id: String, score: f64 },
    ConsecutiveLowLqa { freelancer_id: String, scores: Vec<f64> },
}

impl EscalationEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FreelancerWarning { .. } => "freelancer_warning",
            Self::ConsecutiveLowLqa { .. } => "consecutive_low_lqa",
        }
    }

    fn detail(&self, settings: &QualitySettings) -> EscalationDetail {
        match self {
            Self::FreelancerWarning { score, .. } => EscalationDetail {
                kind: self.kind().to_string(),
                scores: vec![*score],
                threshold: settings.probation_threshold,
            },
            Self::ConsecutiveLowLqa { scores, .. } => EscalationDetail {
                kind: self.kind().to_string(),
                scores: scores.clone(),
                threshold: LOW_LQA_THRESHOLD,
            },
        }
    }
}

/// Events raised by `check_and_notify`, with delivery counts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EscalationOutcome {
    pub freelancer_id: String,
    pub events: Vec<EscalationEvent>,
    pub notifications: Vec<NotificationIntent>,
    pub dispatch: DispatchSummary,
}

/// Apply both rules to `reports`. Ineligible reports are ignored.
#[must_use]
pub fn evaluate(
    freelancer_id: &str,
    reports: &[QualityReport],
    settings: &QualitySettings,
) -> Vec<EscalationEvent> {
    let mut eligible: Vec<&QualityReport> =
        reports.iter().filter(|r| r.status.is_eligible()).collect();
    if eligible.len() < MIN_ELIGIBLE_REPORTS {
        return Vec::new();
    }

    let mut events = Vec::new();

    let summary = scoring::aggregate(reports, settings);
    if let Some(score) = summary
        .combined
        .filter(|c| *c < settings.probation_threshold)
    {
        events.push(EscalationEvent::FreelancerWarning {
            freelancer_id: freelancer_id.to_string(),
            score,
        });
    }

    // Stable: ties on created_at keep the store's newest-insert-first order.
    eligible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent: Vec<f64> = eligible
        .iter()
        .filter_map(|r| r.lqa_score)
        .take(LOW_LQA_WINDOW)
        .collect();
    if recent.len() == LOW_LQA_WINDOW && recent.iter().all(|s| *s < LOW_LQA_THRESHOLD) {
        events.push(EscalationEvent::ConsecutiveLowLqa {
            freelancer_id: freelancer_id.to_string(),
            scores: recent,
        });
    }

    events
}

fn notifications(
    event: &EscalationEvent,
    freelancer: &Freelancer,
    admins: &[User],
    settings: &QualitySettings,
) -> Vec<NotificationIntent> {
    match event {
        EscalationEvent::FreelancerWarning { score, .. } => {
            let threshold = settings.probation_threshold;
            std::iter::once(messages::improvement_guidance(freelancer, *score, threshold))
                .chain(
                    admins
                        .iter()
                        .map(|admin| messages::admin_escalation(admin, freelancer, *score, threshold)),
                )
                .collect()
        }
        EscalationEvent::ConsecutiveLowLqa { scores, .. } => {
            vec![messages::consecutive_low_lqa(freelancer, scores)]
        }
    }
}

impl ReviewEngine {
    /// Evaluate the escalation rules for one freelancer without side effects.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if the freelancer does not exist.
    pub async fn check(&self, freelancer_id: &str) -> Result<Vec<EscalationEvent>, ReviewError> {
        self.service()
            .get_freelancer(freelancer_id)
            .await
            .or_not_found("freelancer", freelancer_id)?;
        let settings = self.load_settings().await?;
        let reports = self.service().list_eligible_reports(freelancer_id).await?;
        Ok(evaluate(freelancer_id, &reports, &settings))
    }

    /// Evaluate the rules, record the events in the audit trail, and notify.
    ///
    /// Events are recorded together; notifications go out only after they
    /// are all stored.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if the freelancer does not exist, or
    /// `ReviewError::Database` if reading history or recording an event
    /// fails. Delivery failures are counted, not returned.
    pub async fn check_and_notify(
        &self,
        actor: &Actor,
        freelancer_id: &str,
    ) -> Result<EscalationOutcome, ReviewError> {
        let freelancer = self
            .service()
            .get_freelancer(freelancer_id)
            .await
            .or_not_found("freelancer", freelancer_id)?;
        let settings = self.load_settings().await?;
        let reports = self.service().list_eligible_reports(freelancer_id).await?;
        let events = evaluate(freelancer_id, &reports, &settings);

        let admins = if events.is_empty() {
            Vec::new()
        } else {
            self.service().list_users_by_roles(&[UserRole::Admin]).await?
        };

        let details: Vec<_> = events.iter().map(|e| e.detail(&settings)).collect();
        self.service()
            .record_escalations(Some(&actor.user_id), freelancer_id, &details)
            .await?;

        let mut intents = Vec::new();
        for event in &events {
            tracing::info!(freelancer_id, kind = event.kind(), "escalation raised");
            intents.extend(notifications(event, &freelancer, &admins, &settings));
        }

        let dispatch = dispatch_all(self.dispatcher(), &intents).await;
        Ok(EscalationOutcome {
            freelancer_id: freelancer_id.to_string(),
            events,
            notifications: intents,
            dispatch,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use lqa_core::enums::{ReportStatus, ReportType};

    fn report(n: i64, status: ReportStatus, lqa: Option<f64>, qs: Option<f64>) -> QualityReport {
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap() + Duration::days(n);
        QualityReport {
            id: format!("rpt-{n:08x}"),
            freelancer_id: "frl-00000001".into(),
            project_name: "Support articles".into(),
            report_type: match (lqa, qs) {
                (Some(_), Some(_)) => ReportType::Combined,
                (None, Some(_)) => ReportType::Qs,
                _ => ReportType::Lqa,
            },
            lqa_score: lqa,
            qs_score: qs,
            lqa_errors: vec![],
            status,
            reviewer_id: None,
            reviewer_comments: None,
            translator_comments: None,
            submission_date: None,
            review_deadline: None,
            finalization_date: None,
            final_reviewer_comments: None,
            version: 3,
            created_at: at,
            updated_at: at,
        }
    }

    fn finalized(n: i64, lqa: Option<f64>, qs: Option<f64>) -> QualityReport {
        report(n, ReportStatus::Finalized, lqa, qs)
    }

    #[test]
    fn same_instant_reports_keep_given_order() {
        let at = Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap();
        let mut reports: Vec<QualityReport> = [
            ("rpt-00000001", 60.0),
            ("rpt-00000002", 62.0),
            ("rpt-00000003", 64.0),
            ("rpt-ffffffff", 95.0),
        ]
        .into_iter()
        .map(|(id, lqa)| {
            let mut r = finalized(1, Some(lqa), None);
            r.id = id.into();
            r.created_at = at;
            r
        })
        .collect();
        reports.push(finalized(0, Some(90.0), None));

        let events = evaluate("frl-00000001", &reports, &QualitySettings::default());
        let streak = events
            .iter()
            .find_map(|e| match e {
                EscalationEvent::ConsecutiveLowLqa { scores, .. } => Some(scores.clone()),
                EscalationEvent::FreelancerWarning { .. } => None,
            })
            .expect("the three newest reports by store order are all low");
        assert_eq!(streak, vec![60.0, 62.0, 64.0]);
    }

    #[test]
    fn low_history_fires_both_rules() {
        let reports = vec![
            finalized(1, Some(60.0), None),
            finalized(2, Some(65.0), None),
            report(3, ReportStatus::TranslatorAccepted, Some(62.0), None),
        ];
        let events = evaluate("frl-00000001", &reports, &QualitySettings::default());
        assert_eq!(events.len(), 2);

        match &events[0] {
            EscalationEvent::FreelancerWarning { score, .. } => {
                assert!((score - 62.333_333).abs() < 1e-4);
            }
            other => panic!("expected warning, got {other:?}"),
        }
        assert_eq!(
            events[1],
            EscalationEvent::ConsecutiveLowLqa {
                freelancer_id: "frl-00000001".into(),
                scores: vec![62.0, 65.0, 60.0],
            }
        );
    }

    #[test]
    fn healthy_mixed_history_fires_nothing() {
        let reports = vec![
            finalized(1, Some(85.0), None),
            finalized(2, Some(90.0), None),
            finalized(3, None, Some(4.5)),
        ];
        assert!(evaluate("frl-00000001", &reports, &QualitySettings::default()).is_empty());
    }

    #[test]
    fn small_sample_never_escalates() {
        let reports = vec![
            finalized(1, Some(0.0), Some(0.0)),
            finalized(2, Some(1.0), None),
            report(3, ReportStatus::TranslatorDisputed, Some(2.0), None),
            report(4, ReportStatus::PendingTranslatorReview, Some(3.0), None),
        ];
        assert!(evaluate("frl-00000001", &reports, &QualitySettings::default()).is_empty());
    }

    #[test]
    fn streak_needs_three_lqa_scores() {
        // Combined average stays above threshold; only two LQA scores exist.
        let reports = vec![
            finalized(1, None, Some(5.0)),
            finalized(2, Some(65.0), None),
            finalized(3, Some(66.0), None),
        ];
        let events = evaluate("frl-00000001", &reports, &QualitySettings::default());
        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn streak_uses_most_recent_scores() {
        let reports = vec![
            finalized(1, Some(50.0), None),
            finalized(2, Some(95.0), None),
            finalized(3, Some(60.0), None),
            finalized(4, Some(61.0), None),
        ];
        let events = evaluate(
            "frl-00000001",
            &reports,
            &QualitySettings {
                probation_threshold: 10.0,
                ..QualitySettings::default()
            },
        );
        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn warning_only_when_streak_is_broken() {
        let reports = vec![
            finalized(1, Some(40.0), None),
            finalized(2, Some(45.0), None),
            finalized(3, Some(80.0), None),
        ];
        let events = evaluate("frl-00000001", &reports, &QualitySettings::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "freelancer_warning");
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = EscalationEvent::FreelancerWarning {
            freelancer_id: "frl-00000001".into(),
            score: 62.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "freelancer_warning");
        assert_eq!(json["score"], 62.5);
    }
}
