use lqa_core::entities::NewQualityReport;
use lqa_core::enums::ReportType;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_enum, parse_error_entries};
use crate::context::AppContext;
use crate::output::output;

pub struct NewReportArgs<'a> {
    pub freelancer: &'a str,
    pub project: &'a str,
    pub report_type: &'a str,
    pub lqa: Option<f64>,
    pub qs: Option<f64>,
    pub errors: &'a [String],
    pub reviewer: Option<&'a str>,
    pub comments: Option<&'a str>,
}

pub async fn run(args: &NewReportArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor(flags).await?;
    let input = NewQualityReport {
        freelancer_id: args.freelancer.to_string(),
        project_name: args.project.to_string(),
        report_type: parse_enum::<ReportType>(args.report_type, "report type")?,
        lqa_score: args.lqa,
        qs_score: args.qs,
        lqa_errors: parse_error_entries(args.errors)?,
        reviewer_id: args.reviewer.map(ToString::to_string),
        reviewer_comments: args.comments.map(ToString::to_string),
    };

    let report = ctx.engine.create_report(&actor, &input).await?;
    output(&report, flags.format)
}
