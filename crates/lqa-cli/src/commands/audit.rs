use lqa_core::enums::AuditAction;
use lqa_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lqa audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let action = args
        .action
        .as_deref()
        .map(|value| parse_enum::<AuditAction>(value, "action"))
        .transpose()?;

    let filter = AuditFilter {
        entity_id: Some(args.entity_id.clone()),
        action,
        limit: Some(effective_limit(None, flags.limit, ctx.config.general.default_limit)),
        ..AuditFilter::default()
    };
    let entries = ctx.service().query_audit(&filter).await?;
    output(&entries, flags.format)
}
