use clap::Subcommand;

use super::Context;
use crate::error::CliResult;

#[derive(Subcommand, Debug)]
pub enum PodCmd {
    /// Display the list of known pod instances
    List,
    /// Display the status for tasks in one pod or all pods
    Status { pod: Option<String> },
    /// Display the full state information for tasks in a pod
    Info { pod: String },
    /// Restart a pod in place on its current agent
    Restart { pod: String },
    /// Destroy a pod and move it to a new agent
    Replace { pod: String },
}

pub async fn run_pod(ctx: &Context, cmd: PodCmd) -> CliResult<()> {
    let q = &ctx.queries.pod;
    let client = &ctx.service;
    match cmd {
        PodCmd::List => q.list(client).await,
        PodCmd::Status { pod } => q.status(client, pod.as_deref()).await,
        PodCmd::Info { pod } => q.info(client, &pod).await,
        PodCmd::Restart { pod } => q.restart(client, &pod).await,
        PodCmd::Replace { pod } => q.replace(client, &pod).await,
    }
}
