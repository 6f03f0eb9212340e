//! The review engine: guarded report transitions backed by the entity store.
//!
//! Each transition loads the report, plans it with [`plan_transition`], and
//! writes it with a conditional update on the status and version that were
//! read. Notifications are built only after the write commits, then handed to
//! the dispatcher.

use std::collections::HashSet;
use std::sync::Arc;

use lqa_core::entities::{
    NewQualityReport, QualityReport, QualitySettings, User, validate_required_scores, validate_scores,
};
use lqa_core::enums::{ReportAction, UserRole};
use lqa_core::identity::Actor;
use lqa_core::responses::{ScorecardResponse, TransitionResponse};
use lqa_core::scoring;
use lqa_db::helpers::now;
use lqa_db::service::LqaService;
use lqa_db::updates::report::ReportUpdate;

use crate::error::{OrNotFound, ReviewError};
use crate::machine::plan_transition;
use crate::messages;
use crate::notify::{DispatchSummary, NotificationDispatcher, NotificationIntent, dispatch_all};

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub report: QualityReport,
    pub notifications: Vec<NotificationIntent>,
    pub dispatch: DispatchSummary,
}

impl TransitionOutcome {
    #[must_use]
    pub fn into_response(self) -> TransitionResponse {
        TransitionResponse {
            report: self.report,
            notifications_sent: self.dispatch.sent,
            notifications_failed: self.dispatch.failed,
        }
    }
}

/// Drives report transitions, escalation checks, and the deadline sweep.
pub struct ReviewEngine {
    service: LqaService,
    dispatcher: Arc<dyn NotificationDispatcher>,
    fallback_settings: QualitySettings,
}

impl ReviewEngine {
    /// `fallback_settings` apply whenever no settings record is active.
    #[must_use]
    pub fn new(
        service: LqaService,
        dispatcher: Arc<dyn NotificationDispatcher>,
        fallback_settings: QualitySettings,
    ) -> Self {
        Self {
            service,
            dispatcher,
            fallback_settings,
        }
    }

    #[must_use]
    pub const fn service(&self) -> &LqaService {
        &self.service
    }

    pub(crate) fn dispatcher(&self) -> &dyn NotificationDispatcher {
        self.dispatcher.as_ref()
    }

    /// The active settings record, or the fallback when none exists.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Database` if the lookup fails.
    pub async fn load_settings(&self) -> Result<QualitySettings, ReviewError> {
        Ok(self
            .service
            .get_active_settings()
            .await?
            .map_or(self.fallback_settings, |record| record.settings))
    }

    /// Create a draft report.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Validation` for bad scores or a type/score
    /// mismatch, `ReviewError::NotFound` if the freelancer does not exist.
    pub async fn create_report(
        &self,
        actor: &Actor,
        input: &NewQualityReport,
    ) -> Result<QualityReport, ReviewError> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        self.service
            .get_freelancer(&input.freelancer_id)
            .await
            .or_not_found("freelancer", &input.freelancer_id)?;
        Ok(self
            .service
            .create_report(Some(&actor.user_id), input)
            .await?)
    }

    /// Edit report content. Scores cannot change once the report is finalized.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Validation` for out-of-range scores or an edit
    /// that clears a score the report type requires,
    /// `ReviewError::InvalidState` when editing scores of a finalized report,
    /// or `ReviewError::NotFound`.
    pub async fn update_report(
        &self,
        actor: &Actor,
        id: &str,
        update: &ReportUpdate,
    ) -> Result<QualityReport, ReviewError> {
        validate_scores(
            update.lqa_score.flatten(),
            update.qs_score.flatten(),
            update.lqa_errors.as_deref().unwrap_or_default(),
        )
        .map_err(|e| ReviewError::Validation(e.to_string()))?;
        if update.project_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ReviewError::Validation("project_name must not be blank".into()));
        }
        if update.lqa_score.is_some() || update.qs_score.is_some() {
            let current = self.get_report(id).await?;
            validate_required_scores(
                current.report_type,
                update.lqa_score.unwrap_or(current.lqa_score),
                update.qs_score.unwrap_or(current.qs_score),
            )
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        }
        self.service
            .update_report(Some(&actor.user_id), id, update)
            .await
            .or_not_found("report", id)
    }

    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if no report has this ID.
    pub async fn get_report(&self, id: &str) -> Result<QualityReport, ReviewError> {
        self.service.get_report(id).await.or_not_found("report", id)
    }

    /// Send a report to its freelancer. Admins and project managers only.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Permission`, `ReviewError::InvalidState`,
    /// `ReviewError::NotFound`, or `ReviewError::Conflict`.
    pub async fn submit_for_review(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<TransitionOutcome, ReviewError> {
        self.transition(actor, id, ReportAction::SubmitForReview, None)
            .await
    }

    /// Translator accepts the report.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidState` unless the report is pending
    /// translator review, `ReviewError::NotFound`, or `ReviewError::Conflict`.
    pub async fn accept(&self, actor: &Actor, id: &str) -> Result<TransitionOutcome, ReviewError> {
        self.transition(actor, id, ReportAction::Accept, None).await
    }

    /// Translator disputes the report with a comment.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Validation` for a blank comment,
    /// `ReviewError::InvalidState` unless the report is pending translator
    /// review, `ReviewError::NotFound`, or `ReviewError::Conflict`.
    pub async fn dispute(
        &self,
        actor: &Actor,
        id: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, ReviewError> {
        self.transition(actor, id, ReportAction::Dispute, Some(comment))
            .await
    }

    /// Move a disputed report into final review. Admins and project managers only.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Permission`, `ReviewError::InvalidState`,
    /// `ReviewError::NotFound`, or `ReviewError::Conflict`.
    pub async fn begin_final_review(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<TransitionOutcome, ReviewError> {
        self.transition(actor, id, ReportAction::BeginFinalReview, None)
            .await
    }

    /// Close a disputed report. Admins and project managers only.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Permission`, `ReviewError::InvalidState`,
    /// `ReviewError::NotFound`, or `ReviewError::Conflict`.
    pub async fn finalize(
        &self,
        actor: &Actor,
        id: &str,
        comment: Option<&str>,
    ) -> Result<TransitionOutcome, ReviewError> {
        self.transition(actor, id, ReportAction::Finalize, comment)
            .await
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: &str,
        action: ReportAction,
        comment: Option<&str>,
    ) -> Result<TransitionOutcome, ReviewError> {
        let report = self.get_report(id).await?;
        let settings = self.load_settings().await?;
        let plan = plan_transition(&report, action, actor, comment, &settings, now())?;

        tracing::debug!(report_id = %id, %action, from = %plan.from, to = %plan.to, "applying transition");
        let report = self
            .service
            .apply_report_transition(Some(&actor.user_id), id, &plan)
            .await
            .or_not_found("report", id)?;

        let notifications = self.notifications_for(action, &report).await;
        let dispatch = dispatch_all(self.dispatcher(), &notifications).await;
        Ok(TransitionOutcome {
            report,
            notifications,
            dispatch,
        })
    }

    /// Notifications owed after `action` committed on `report`.
    ///
    /// A failed recipient lookup is logged and yields fewer notifications; the
    /// transition itself has already succeeded.
    pub(crate) async fn notifications_for(
        &self,
        action: ReportAction,
        report: &QualityReport,
    ) -> Vec<NotificationIntent> {
        match self.build_notifications(action, report).await {
            Ok(intents) => intents,
            Err(e) => {
                tracing::warn!(
                    report_id = %report.id,
                    %action,
                    error = %e,
                    "could not resolve notification recipients"
                );
                Vec::new()
            }
        }
    }

    async fn build_notifications(
        &self,
        action: ReportAction,
        report: &QualityReport,
    ) -> Result<Vec<NotificationIntent>, ReviewError> {
        let freelancer = self
            .service
            .get_freelancer(&report.freelancer_id)
            .await
            .or_not_found("freelancer", &report.freelancer_id)?;

        Ok(match action {
            ReportAction::SubmitForReview => report
                .review_deadline
                .map(|deadline| messages::review_requested(&freelancer, report, deadline))
                .into_iter()
                .collect(),
            ReportAction::Dispute => self
                .dispute_recipients(report)
                .await?
                .iter()
                .map(|user| messages::dispute_raised(user, &freelancer, report))
                .collect(),
            ReportAction::Finalize => vec![messages::decision_made(&freelancer, report)],
            ReportAction::AutoAccept => vec![messages::auto_accepted(&freelancer, report)],
            ReportAction::Accept | ReportAction::BeginFinalReview => Vec::new(),
        })
    }

    /// Every admin and project manager, plus the original reviewer, once each.
    async fn dispute_recipients(&self, report: &QualityReport) -> Result<Vec<User>, ReviewError> {
        let mut recipients = self
            .service
            .list_users_by_roles(&[UserRole::Admin, UserRole::ProjectManager])
            .await?;

        if let Some(reviewer_id) = report.reviewer_id.as_deref() {
            match self.service.get_user(reviewer_id).await {
                Ok(reviewer) => recipients.push(reviewer),
                Err(e) => tracing::warn!(
                    report_id = %report.id,
                    reviewer_id,
                    error = %e,
                    "original reviewer not found"
                ),
            }
        }

        let mut seen = HashSet::new();
        recipients.retain(|u| seen.insert(u.email.clone()));
        Ok(recipients)
    }

    /// Eligible report count and scores for one freelancer.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if the freelancer does not exist.
    pub async fn scorecard(&self, freelancer_id: &str) -> Result<ScorecardResponse, ReviewError> {
        let freelancer = self
            .service
            .get_freelancer(freelancer_id)
            .await
            .or_not_found("freelancer", freelancer_id)?;
        let settings = self.load_settings().await?;
        let reports = self.service.list_eligible_reports(freelancer_id).await?;
        let summary = scoring::aggregate(&reports, &settings);

        Ok(ScorecardResponse {
            below_threshold: summary
                .combined
                .is_some_and(|c| c < settings.probation_threshold),
            freelancer,
            settings,
            summary,
        })
    }
}
