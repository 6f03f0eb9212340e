//! Notification intents and the dispatchers that deliver them.
//!
//! Workflow operations never send mail themselves. They return
//! [`NotificationIntent`]s, and [`dispatch_all`] hands each one to a
//! [`NotificationDispatcher`]. Delivery is best effort: a failed send is
//! logged and counted, and never undoes the step that produced it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lqa_config::{NotificationChannel, NotificationsConfig};

/// One message to deliver.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotificationIntent {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl NotificationIntent {
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Counts from one [`dispatch_all`] call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: u32,
    pub failed: u32,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Notification channel not configured: {0}")]
    NotConfigured(String),

    #[error("Outbox write failed: {0}")]
    Outbox(#[from] std::io::Error),

    #[error("Webhook delivery failed: {0}")]
    Webhook(String),
}

/// Delivers a single notification.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Channel name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver `intent`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if delivery fails.
    async fn send(&self, intent: &NotificationIntent) -> Result<(), DispatchError>;
}

/// Send every intent, logging and counting failures.
pub async fn dispatch_all(
    dispatcher: &dyn NotificationDispatcher,
    intents: &[NotificationIntent],
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for intent in intents {
        match dispatcher.send(intent).await {
            Ok(()) => summary.sent += 1,
            Err(e) => {
                tracing::warn!(
                    channel = dispatcher.name(),
                    to = %intent.to,
                    subject = %intent.subject,
                    error = %e,
                    "notification dispatch failed"
                );
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Build the dispatcher selected in config.
///
/// # Errors
///
/// Returns `DispatchError::NotConfigured` if the selected channel is missing
/// its path or URL, or `DispatchError::Webhook` if the HTTP client cannot be
/// built.
pub fn from_config(
    config: &NotificationsConfig,
) -> Result<Arc<dyn NotificationDispatcher>, DispatchError> {
    if !config.is_configured() {
        return Err(DispatchError::NotConfigured(format!(
            "{:?} channel needs its path or URL set in [notifications]",
            config.channel
        )));
    }
    Ok(match config.channel {
        NotificationChannel::Log => Arc::new(LogDispatcher::new(&config.sender)),
        NotificationChannel::Outbox => Arc::new(OutboxDispatcher::new(
            PathBuf::from(&config.outbox_path),
            &config.sender,
        )),
        NotificationChannel::Webhook => Arc::new(WebhookDispatcher::new(
            &config.webhook_url,
            Duration::from_secs(config.webhook_timeout_secs),
            &config.sender,
        )?),
    })
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Writes each notification to the tracing log and delivers nothing.
pub struct LogDispatcher {
    sender: String,
}

impl LogDispatcher {
    #[must_use]
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
        tracing::info!(
            from = %self.sender,
            to = %intent.to,
            subject = %intent.subject,
            "notification"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

/// A queued notification as stored in the outbox file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboxRecord {
    pub from: String,
    #[serde(flatten)]
    pub intent: NotificationIntent,
    pub queued_at: DateTime<Utc>,
}

/// Appends each notification as one JSON line, for a mailer to pick up.
pub struct OutboxDispatcher {
    path: PathBuf,
    sender: String,
}

impl OutboxDispatcher {
    #[must_use]
    pub fn new(path: PathBuf, sender: &str) -> Self {
        Self {
            path,
            sender: sender.to_string(),
        }
    }

    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl NotificationDispatcher for OutboxDispatcher {
    fn name(&self) -> &'static str {
        "outbox"
    }

    async fn send(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let record = OutboxRecord {
            from: self.sender.clone(),
            intent: intent.clone(),
            queued_at: Utc::now(),
        };
        serde_jsonlines::append_json_lines(&self.path, [&record])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WebhookPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// POSTs each notification as JSON to a fixed URL.
pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
    sender: String,
}

impl WebhookDispatcher {
    /// # Errors
    ///
    /// Returns `DispatchError::Webhook` if the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Duration, sender: &str) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Webhook(format!("build client: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload {
                from: &self.sender,
                to: &intent.to,
                subject: &intent.subject,
                body: &intent.body,
            })
            .send()
            .await
            .map_err(|e| DispatchError::Webhook(format!("send: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Webhook(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}
