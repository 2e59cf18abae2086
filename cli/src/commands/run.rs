use clap::Subcommand;
use tracing::debug;

use super::debug::{run_debug, DebugCmd};
use super::plan::{run_plan, PlanCmd};
use super::pod::{run_pod, PodCmd};
use super::Context;
use crate::error::CliResult;
use crate::http_client::Client;
use crate::multipart::encode_run_spec;
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

const RUNS_PATH: &str = "v1/runs";

#[derive(Subcommand, Debug)]
pub enum RunCmd {
    /// Lists all active runs in the queue
    List,

    /// Adds a new run to the queue
    Add {
        /// Type of run
        #[arg(value_name = "type")]
        spec_type: String,
        /// Path to run spec file, or 'stdin' to read from stdin
        #[arg(value_name = "path")]
        spec_file: String,
    },

    /// Uninstalls an active run from the queue
    Remove {
        /// Name of run to delete
        name: String,
    },

    /// View service state useful in debugging
    Debug {
        #[command(subcommand)]
        cmd: DebugCmd,
    },

    /// View client endpoints
    #[command(alias = "endpoint")]
    Endpoints {
        /// Endpoint to show (lists endpoint names when omitted)
        name: Option<String>,
    },

    /// Query service plans
    Plan {
        #[command(subcommand)]
        cmd: PlanCmd,
    },

    /// View Pod/Task state
    Pod {
        #[command(subcommand)]
        cmd: PodCmd,
    },
}

pub async fn run_runs(ctx: &Context, cmd: RunCmd) -> CliResult<()> {
    match cmd {
        RunCmd::List => list_runs(&ctx.service).await,
        RunCmd::Add {
            spec_type,
            spec_file,
        } => add_run(&ctx.service, &spec_type, &spec_file).await,
        RunCmd::Remove { name } => remove_run(&ctx.service, &name).await,
        RunCmd::Debug { cmd } => run_debug(ctx, cmd).await,
        RunCmd::Endpoints { name } => {
            ctx.queries
                .endpoints
                .show(&ctx.service, name.as_deref())
                .await
        }
        RunCmd::Plan { cmd } => run_plan(ctx, cmd).await,
        RunCmd::Pod { cmd } => run_pod(ctx, cmd).await,
    }
}

pub async fn list_runs(client: &Client) -> CliResult<()> {
    let bytes = client.get(RUNS_PATH).await?;
    print_json_bytes(&bytes)
}

/// Nothing is sent unless the whole form was built.
pub async fn add_run(client: &Client, spec_type: &str, spec_file: &str) -> CliResult<()> {
    let form = encode_run_spec(spec_type, spec_file)?;
    debug!(spec_type, spec_file, body_len = form.body.len(), "adding run");
    let bytes = client
        .post_data(RUNS_PATH, form.body, &form.content_type)
        .await?;
    print_json_bytes(&bytes)
}

pub async fn remove_run(client: &Client, name: &str) -> CliResult<()> {
    let path = format!("{}/{}", RUNS_PATH, encode_segment(name)?);
    let bytes = client.delete(&path).await?;
    print_json_bytes(&bytes)
}
