use crate::cli::GlobalFlags;
use crate::cli::subcommands::FreelancerCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lqa freelancer`.
pub async fn handle(
    action: &FreelancerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FreelancerCommands::Create { name, email } => {
            let actor_id = ctx.optional_actor_id(flags).await?;
            let freelancer = ctx
                .service()
                .create_freelancer(actor_id.as_deref(), name, email)
                .await?;
            output(&freelancer, flags.format)
        }
        FreelancerCommands::Get { id } => {
            let freelancer = ctx.service().get_freelancer(id).await?;
            output(&freelancer, flags.format)
        }
        FreelancerCommands::List => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let freelancers = ctx.service().list_freelancers(limit).await?;
            output(&freelancers, flags.format)
        }
        FreelancerCommands::Score { id } => {
            let scorecard = ctx.engine.scorecard(id).await?;
            output(&scorecard, flags.format)
        }
    }
}
