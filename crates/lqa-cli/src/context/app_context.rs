use std::path::Path;

use anyhow::Context;
use lqa_config::LqaConfig;
use lqa_core::enums::UserRole;
use lqa_core::identity::Actor;
use lqa_core::ids::{PREFIX_FREELANCER, has_prefix};
use lqa_db::service::LqaService;
use lqa_review::ReviewEngine;
use lqa_review::notify;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub engine: ReviewEngine,
    pub config: LqaConfig,
}

impl AppContext {
    /// Open the database and build the notification dispatcher from config.
    pub async fn init(config: LqaConfig) -> anyhow::Result<Self> {
        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let service = LqaService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let dispatcher = notify::from_config(&config.notifications)
            .context("failed to configure notification channel")?;
        let engine = ReviewEngine::new(service, dispatcher, config.policy);

        Ok(Self { engine, config })
    }

    pub const fn service(&self) -> &LqaService {
        self.engine.service()
    }

    /// Resolve `--as` into the caller identity.
    ///
    /// Freelancer IDs act as translators; anything else must be a user.
    pub async fn actor(&self, flags: &GlobalFlags) -> anyhow::Result<Actor> {
        let Some(id) = flags.acting_as.as_deref() else {
            anyhow::bail!("this command needs a caller identity: pass --as <user-id|freelancer-id>");
        };

        if has_prefix(id, PREFIX_FREELANCER) {
            let freelancer = self
                .service()
                .get_freelancer(id)
                .await
                .with_context(|| format!("unknown freelancer '{id}'"))?;
            return Ok(Actor::new(freelancer.id, UserRole::Translator));
        }

        let user = self
            .service()
            .get_user(id)
            .await
            .with_context(|| format!("unknown user '{id}'"))?;
        Ok(Actor::new(user.id, user.role))
    }

    /// Actor ID for audit entries when a caller identity is optional.
    pub async fn optional_actor_id(&self, flags: &GlobalFlags) -> anyhow::Result<Option<String>> {
        if flags.acting_as.is_none() {
            return Ok(None);
        }
        Ok(Some(self.actor(flags).await?.user_id))
    }
}
