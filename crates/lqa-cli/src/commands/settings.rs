use lqa_core::entities::QualitySettings;
use lqa_core::enums::UserRole;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SettingsCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Settings in effect and where they came from.
#[derive(Debug, Serialize)]
struct SettingsView {
    /// `active` for a saved record, `config` for the `[policy]` fallback.
    source: &'static str,
    record_id: Option<String>,
    #[serde(flatten)]
    settings: QualitySettings,
}

/// Handle `lqa settings`.
pub async fn handle(
    action: &SettingsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SettingsCommands::Get => {
            let view = match ctx.service().get_active_settings().await? {
                Some(record) => SettingsView {
                    source: "active",
                    record_id: Some(record.id),
                    settings: record.settings,
                },
                None => SettingsView {
                    source: "config",
                    record_id: None,
                    settings: ctx.config.policy,
                },
            };
            output(&view, flags.format)
        }
        SettingsCommands::Set {
            dispute_period_days,
            probation_threshold,
            lqa_weight,
            qs_multiplier,
        } => {
            let actor = ctx.actor(flags).await?;
            anyhow::ensure!(
                actor.role == UserRole::Admin,
                "only an admin can change review settings (caller role: {})",
                actor.role
            );

            let current = ctx.engine.load_settings().await?;
            let next = QualitySettings {
                dispute_period_days: dispute_period_days.unwrap_or(current.dispute_period_days),
                probation_threshold: probation_threshold.unwrap_or(current.probation_threshold),
                lqa_weight: lqa_weight.unwrap_or(current.lqa_weight),
                qs_multiplier: qs_multiplier.unwrap_or(current.qs_multiplier),
            };

            let record = ctx
                .service()
                .set_active_settings(Some(&actor.user_id), next)
                .await?;
            output(&record, flags.format)
        }
        SettingsCommands::History => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let history = ctx.service().list_settings_history(limit).await?;
            output(&history, flags.format)
        }
    }
}
