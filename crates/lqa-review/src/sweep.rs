//! Deadline sweep: auto-accept reports the translator never answered.
//!
//! Meant to be run periodically (`lqa sweep` from cron or a systemd timer).
//! Each expired report goes through the same transition table as a manual
//! accept, using the `auto_accept` action and the system actor, so a report
//! the translator answers concurrently is skipped rather than overwritten.

use chrono::{DateTime, Utc};

use lqa_core::enums::ReportAction;
use lqa_core::identity::Actor;
use lqa_core::responses::SweepResponse;

use crate::error::ReviewError;
use crate::machine::plan_transition;
use crate::notify::dispatch_all;
use crate::workflow::ReviewEngine;

impl ReviewEngine {
    /// Auto-accept every `pending_translator_review` report whose review
    /// deadline is at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Database` if the expired reports cannot be
    /// listed. Failures on individual reports are logged and reported as
    /// skipped.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<SweepResponse, ReviewError> {
        let actor = Actor::system();
        let settings = self.load_settings().await?;
        let expired = self.service().list_expired_reviews(now).await?;

        let mut auto_accepted = Vec::new();
        let mut skipped = Vec::new();
        let mut intents = Vec::new();

        for report in expired {
            let applied = match plan_transition(
                &report,
                ReportAction::AutoAccept,
                &actor,
                None,
                &settings,
                now,
            ) {
                Ok(plan) => self
                    .service()
                    .apply_report_transition(Some(&actor.user_id), &report.id, &plan)
                    .await
                    .map_err(ReviewError::from),
                Err(e) => Err(e),
            };

            match applied {
                Ok(accepted) => {
                    intents.extend(
                        self.notifications_for(ReportAction::AutoAccept, &accepted)
                            .await,
                    );
                    auto_accepted.push(accepted.id);
                }
                Err(e) => {
                    tracing::warn!(report_id = %report.id, error = %e, "sweep skipped report");
                    skipped.push(report.id);
                }
            }
        }

        let dispatch = dispatch_all(self.dispatcher(), &intents).await;
        tracing::info!(
            auto_accepted = auto_accepted.len(),
            skipped = skipped.len(),
            "deadline sweep finished"
        );
        Ok(SweepResponse {
            auto_accepted,
            skipped,
            notifications_sent: dispatch.sent,
            notifications_failed: dispatch.failed,
        })
    }
}
