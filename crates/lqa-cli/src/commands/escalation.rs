use lqa_core::identity::Actor;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EscalationCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DryRunView {
    freelancer_id: String,
    dry_run: bool,
    events: Vec<lqa_review::EscalationEvent>,
}

/// Handle `lqa escalation`.
pub async fn handle(
    action: &EscalationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EscalationCommands::Check {
            freelancer_id,
            dry_run: true,
        } => {
            let events = ctx.engine.check(freelancer_id).await?;
            output(
                &DryRunView {
                    freelancer_id: freelancer_id.clone(),
                    dry_run: true,
                    events,
                },
                flags.format,
            )
        }
        EscalationCommands::Check {
            freelancer_id,
            dry_run: false,
        } => {
            // Scheduled runs have no caller; they act as the system.
            let actor = if flags.acting_as.is_some() {
                ctx.actor(flags).await?
            } else {
                Actor::system()
            };
            let outcome = ctx.engine.check_and_notify(&actor, freelancer_id).await?;
            output(&outcome, flags.format)
        }
    }
}
