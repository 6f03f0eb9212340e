//! Outbound notification channel configuration.

use serde::{Deserialize, Serialize};

/// Where notification intents are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Log each notification through `tracing` and deliver nothing.
    #[default]
    Log,
    /// Append each notification as a JSON line to `outbox_path`.
    Outbox,
    /// POST each notification as JSON to `webhook_url`.
    Webhook,
}

fn default_outbox_path() -> String {
    ".lqa/outbox.jsonl".to_string()
}

fn default_sender() -> String {
    "Quality Team".to_string()
}

const fn default_webhook_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub channel: NotificationChannel,

    /// JSONL file used by the outbox channel.
    #[serde(default = "default_outbox_path")]
    pub outbox_path: String,

    /// Endpoint used by the webhook channel.
    #[serde(default)]
    pub webhook_url: String,

    /// Request timeout for the webhook channel, in seconds.
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,

    /// Display name used as the sender of every notification.
    #[serde(default = "default_sender")]
    pub sender: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            channel: NotificationChannel::default(),
            outbox_path: default_outbox_path(),
            webhook_url: String::new(),
            webhook_timeout_secs: default_webhook_timeout_secs(),
            sender: default_sender(),
        }
    }
}

impl NotificationsConfig {
    /// Check if the selected channel has what it needs to deliver.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.channel {
            NotificationChannel::Log => true,
            NotificationChannel::Outbox => !self.outbox_path.is_empty(),
            NotificationChannel::Webhook => !self.webhook_url.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_logs_only() {
        let config = NotificationsConfig::default();
        assert_eq!(config.channel, NotificationChannel::Log);
        assert!(config.is_configured());
        assert_eq!(config.webhook_timeout_secs, 10);
    }

    #[test]
    fn webhook_needs_url() {
        let mut config = NotificationsConfig {
            channel: NotificationChannel::Webhook,
            ..Default::default()
        };
        assert!(!config.is_configured());

        config.webhook_url = "https://hooks.example.com/lqa".into();
        assert!(config.is_configured());
    }
}
