use clap::Subcommand;

use super::Context;
use crate::error::CliResult;
use crate::queries::plan::DEFAULT_PLAN;

#[derive(Subcommand, Debug)]
pub enum PlanCmd {
    /// Show all plans for this run
    List,
    /// Display the status of a plan
    Show {
        #[arg(default_value = DEFAULT_PLAN)]
        plan: String,
    },
    /// Start a plan, with optional parameters
    Start {
        plan: String,
        /// Envvar parameter for the plan, in KEY=VALUE form (repeatable)
        #[arg(short = 'p', long = "params")]
        params: Vec<String>,
    },
    /// Stop a running plan
    Stop { plan: String },
    /// Pause a plan, or one of its phases
    Pause {
        plan: String,
        #[arg(long)]
        phase: Option<String>,
    },
    /// Resume a paused plan, or one of its phases
    Resume {
        plan: String,
        #[arg(long)]
        phase: Option<String>,
    },
    /// Restart a plan, or one of its phases or steps
    ForceRestart {
        plan: String,
        phase: Option<String>,
        step: Option<String>,
    },
    /// Force a step to complete
    ForceComplete {
        plan: String,
        phase: String,
        step: String,
    },
}

pub async fn run_plan(ctx: &Context, cmd: PlanCmd) -> CliResult<()> {
    let q = &ctx.queries.plan;
    let client = &ctx.service;
    match cmd {
        PlanCmd::List => q.list(client).await,
        PlanCmd::Show { plan } => q.show(client, &plan).await,
        PlanCmd::Start { plan, params } => q.start(client, &plan, &params).await,
        PlanCmd::Stop { plan } => q.stop(client, &plan).await,
        PlanCmd::Pause { plan, phase } => q.pause(client, &plan, phase.as_deref()).await,
        PlanCmd::Resume { plan, phase } => q.resume(client, &plan, phase.as_deref()).await,
        PlanCmd::ForceRestart { plan, phase, step } => {
            q.force_restart(client, &plan, phase.as_deref(), step.as_deref())
                .await
        }
        PlanCmd::ForceComplete { plan, phase, step } => {
            q.force_complete(client, &plan, &phase, &step).await
        }
    }
}
