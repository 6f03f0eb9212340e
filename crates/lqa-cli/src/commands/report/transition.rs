use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// A lifecycle step requested from the command line.
pub enum Step<'a> {
    Submit,
    Accept,
    Dispute(&'a str),
    BeginFinalReview,
    Finalize(Option<&'a str>),
}

pub async fn run(step: Step<'_>, id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor(flags).await?;
    let engine = &ctx.engine;

    let outcome = match step {
        Step::Submit => engine.submit_for_review(&actor, id).await?,
        Step::Accept => engine.accept(&actor, id).await?,
        Step::Dispute(comment) => engine.dispute(&actor, id, comment).await?,
        Step::BeginFinalReview => engine.begin_final_review(&actor, id).await?,
        Step::Finalize(comment) => engine.finalize(&actor, id, comment).await?,
    };

    if outcome.dispatch.failed > 0 {
        tracing::warn!(
            report_id = id,
            failed = outcome.dispatch.failed,
            "some notifications were not delivered"
        );
    }
    output(&outcome.into_response(), flags.format)
}
