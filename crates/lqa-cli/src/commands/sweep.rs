use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SweepArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lqa sweep`.
pub async fn handle(args: &SweepArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let now = match args.at.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --at '{raw}': expected RFC 3339"))?
            .with_timezone(&Utc),
        None => lqa_db::helpers::now(),
    };

    let result = ctx.engine.sweep_expired(now).await?;
    output(&result, flags.format)
}
