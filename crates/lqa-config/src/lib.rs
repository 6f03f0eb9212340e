//! # lqa-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LQA_*` prefix, `__` as separator)
//! 2. Project-level `.lqa/config.toml`
//! 3. User-level `~/.config/lqa/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LQA_POLICY__PROBATION_THRESHOLD` -> `policy.probation_threshold`,
//! `LQA_NOTIFICATIONS__CHANNEL` -> `notifications.channel`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lqa_config::LqaConfig;
//!
//! let config = LqaConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! println!("fallback dispute period: {} days", config.policy.dispute_period_days);
//! ```

mod database;
mod error;
mod general;
mod notifications;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use notifications::{NotificationChannel, NotificationsConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use lqa_core::entities::QualitySettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LqaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Policy applied when no active settings record exists in the database.
    #[serde(default)]
    pub policy: QualitySettings,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LqaConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lqa/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LQA_").split("__"))
    }

    /// Reject values the review workflow cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an out-of-range policy value and
    /// `ConfigError::NotConfigured` when the selected notification channel is
    /// missing its target.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "policy".into(),
                reason: e.to_string(),
            })?;
        if !self.notifications.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "notifications".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lqa").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or falls back to the
    /// current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LqaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy, QualitySettings::default());
        assert_eq!(config.notifications.channel, NotificationChannel::Log);
    }

    #[test]
    fn figment_builds_without_files() {
        let config: LqaConfig = LqaConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.policy.dispute_period_days, 7);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let mut config = LqaConfig::default();
        config.policy.lqa_weight = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn webhook_without_url_is_rejected() {
        let mut config = LqaConfig::default();
        config.notifications.channel = NotificationChannel::Webhook;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
