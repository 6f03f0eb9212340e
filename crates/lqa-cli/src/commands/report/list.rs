use lqa_core::enums::ReportStatus;
use lqa_db::repos::report::ReportFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    freelancer: Option<&str>,
    statuses: &[String],
    reviewer: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let statuses = statuses
        .iter()
        .map(|value| parse_enum::<ReportStatus>(value, "status"))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let filter = ReportFilter {
        freelancer_id: freelancer.map(ToString::to_string),
        statuses,
        reviewer_id: reviewer.map(ToString::to_string),
        limit: Some(effective_limit(None, flags.limit, ctx.config.general.default_limit)),
    };
    let reports = ctx.service().list_reports(&filter).await?;
    output(&reports, flags.format)
}
