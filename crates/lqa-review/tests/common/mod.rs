//! Shared fixtures for lqa-review integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lqa_core::entities::{Freelancer, NewQualityReport, QualityReport, QualitySettings, User};
use lqa_core::enums::{ReportType, UserRole};
use lqa_core::identity::Actor;
use lqa_db::service::LqaService;
use lqa_review::notify::{DispatchError, NotificationDispatcher};
use lqa_review::{NotificationIntent, ReviewEngine};

/// Keeps every intent it is handed.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<NotificationIntent>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<NotificationIntent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(intent.clone());
        Ok(())
    }
}

/// Fails every send.
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn send(&self, _intent: &NotificationIntent) -> Result<(), DispatchError> {
        Err(DispatchError::Webhook("HTTP 503 Service Unavailable".into()))
    }
}

pub struct Fixture {
    pub engine: ReviewEngine,
    pub outbox: Arc<RecordingDispatcher>,
    pub admin: User,
    pub pm: User,
    pub reviewer: User,
    pub freelancer: Freelancer,
}

impl Fixture {
    pub async fn new() -> Self {
        let outbox = Arc::new(RecordingDispatcher::default());
        Self::with_dispatcher(outbox.clone(), outbox).await
    }

    pub async fn with_dispatcher(
        dispatcher: Arc<dyn NotificationDispatcher>,
        outbox: Arc<RecordingDispatcher>,
    ) -> Self {
        let service = LqaService::new_local(":memory:").await.unwrap();
        let admin = service
            .create_user(None, "Alex Admin", "alex@example.com", UserRole::Admin)
            .await
            .unwrap();
        let pm = service
            .create_user(None, "Pat Manager", "pat@example.com", UserRole::ProjectManager)
            .await
            .unwrap();
        let reviewer = service
            .create_user(None, "Rui Reviewer", "rui@example.com", UserRole::Reviewer)
            .await
            .unwrap();
        let freelancer = service
            .create_freelancer(None, "Ines Duarte", "ines@example.com")
            .await
            .unwrap();

        Self {
            engine: ReviewEngine::new(service, dispatcher, QualitySettings::default()),
            outbox,
            admin,
            pm,
            reviewer,
            freelancer,
        }
    }

    pub fn pm_actor(&self) -> Actor {
        Actor::new(&self.pm.id, UserRole::ProjectManager)
    }

    pub fn translator_actor(&self) -> Actor {
        Actor::new(&self.freelancer.id, UserRole::Translator)
    }

    pub fn draft(&self, lqa: Option<f64>, qs: Option<f64>) -> NewQualityReport {
        NewQualityReport {
            freelancer_id: self.freelancer.id.clone(),
            project_name: "Release notes".into(),
            report_type: match (lqa, qs) {
                (Some(_), Some(_)) => ReportType::Combined,
                (None, Some(_)) => ReportType::Qs,
                _ => ReportType::Lqa,
            },
            lqa_score: lqa,
            qs_score: qs,
            lqa_errors: vec![],
            reviewer_id: Some(self.reviewer.id.clone()),
            reviewer_comments: None,
        }
    }

    /// A draft report submitted to the translator.
    pub async fn pending_report(&self, lqa: Option<f64>, qs: Option<f64>) -> QualityReport {
        let report = self
            .engine
            .create_report(&self.pm_actor(), &self.draft(lqa, qs))
            .await
            .unwrap();
        self.engine
            .submit_for_review(&self.pm_actor(), &report.id)
            .await
            .unwrap()
            .report
    }

    /// A report the translator has accepted, so it counts towards scores.
    pub async fn accepted_report(&self, lqa: Option<f64>, qs: Option<f64>) -> QualityReport {
        let report = self.pending_report(lqa, qs).await;
        self.engine
            .accept(&self.translator_actor(), &report.id)
            .await
            .unwrap()
            .report
    }
}
