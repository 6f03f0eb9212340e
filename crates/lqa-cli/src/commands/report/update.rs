use lqa_db::updates::report::ReportUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_error_entries;
use crate::context::AppContext;
use crate::output::output;

pub struct ReportEditArgs<'a> {
    pub project: Option<&'a str>,
    pub lqa: Option<f64>,
    pub qs: Option<f64>,
    pub errors: &'a [String],
    pub reviewer: Option<&'a str>,
    pub comments: Option<&'a str>,
}

pub async fn run(
    id: &str,
    args: &ReportEditArgs<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor(flags).await?;

    let mut builder = ReportUpdateBuilder::new();
    if let Some(project) = args.project {
        builder = builder.project_name(project);
    }
    if let Some(lqa) = args.lqa {
        builder = builder.lqa_score(Some(lqa));
    }
    if let Some(qs) = args.qs {
        builder = builder.qs_score(Some(qs));
    }
    if !args.errors.is_empty() {
        builder = builder.lqa_errors(parse_error_entries(args.errors)?);
    }
    if let Some(reviewer) = args.reviewer {
        builder = builder.reviewer_id(Some(reviewer.to_string()));
    }
    if let Some(comments) = args.comments {
        builder = builder.reviewer_comments(Some(comments.to_string()));
    }

    let update = builder.build();
    anyhow::ensure!(!update.is_empty(), "nothing to update: pass at least one field");

    let report = ctx.engine.update_report(&actor, id, &update).await?;
    output(&report, flags.format)
}
