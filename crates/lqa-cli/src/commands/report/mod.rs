mod create;
mod list;
mod transition;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lqa report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ReportCommands::Create {
            freelancer,
            project,
            report_type,
            lqa,
            qs,
            errors,
            reviewer,
            comments,
        } => {
            let input = create::NewReportArgs {
                freelancer,
                project,
                report_type,
                lqa: *lqa,
                qs: *qs,
                errors,
                reviewer: reviewer.as_deref(),
                comments: comments.as_deref(),
            };
            create::run(&input, ctx, flags).await
        }
        ReportCommands::Update {
            id,
            project,
            lqa,
            qs,
            errors,
            reviewer,
            comments,
        } => {
            let change = update::ReportEditArgs {
                project: project.as_deref(),
                lqa: *lqa,
                qs: *qs,
                errors,
                reviewer: reviewer.as_deref(),
                comments: comments.as_deref(),
            };
            update::run(id, &change, ctx, flags).await
        }
        ReportCommands::Get { id } => {
            let report = ctx.engine.get_report(id).await?;
            output(&report, flags.format)
        }
        ReportCommands::List {
            freelancer,
            status,
            reviewer,
        } => list::run(freelancer.as_deref(), status, reviewer.as_deref(), ctx, flags).await,
        ReportCommands::Submit { id } => {
            transition::run(transition::Step::Submit, id, ctx, flags).await
        }
        ReportCommands::Accept { id } => {
            transition::run(transition::Step::Accept, id, ctx, flags).await
        }
        ReportCommands::Dispute { id, comment } => {
            transition::run(transition::Step::Dispute(comment), id, ctx, flags).await
        }
        ReportCommands::BeginFinalReview { id } => {
            transition::run(transition::Step::BeginFinalReview, id, ctx, flags).await
        }
        ReportCommands::Finalize { id, comment } => {
            transition::run(
                transition::Step::Finalize(comment.as_deref()),
                id,
                ctx,
                flags,
            )
            .await
        }
    }
}
