use lqa_core::enums::UserRole;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lqa user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Create { name, email, role } => {
            let role = parse_enum::<UserRole>(role, "role")?;
            let actor_id = ctx.optional_actor_id(flags).await?;
            let user = ctx
                .service()
                .create_user(actor_id.as_deref(), name, email, role)
                .await?;
            output(&user, flags.format)
        }
        UserCommands::List { role } => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let users = match role {
                Some(role) => {
                    let role = parse_enum::<UserRole>(role, "role")?;
                    let mut users = ctx.service().list_users_by_roles(&[role]).await?;
                    users.truncate(limit as usize);
                    users
                }
                None => ctx.service().list_users(limit).await?,
            };
            output(&users, flags.format)
        }
    }
}
