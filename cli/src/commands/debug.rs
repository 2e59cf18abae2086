use clap::Subcommand;

use super::pod::{run_pod, PodCmd};
use super::Context;
use crate::error::CliResult;

#[derive(Subcommand, Debug)]
pub enum DebugCmd {
    /// View configuration history of the run
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
    /// View Pod/Task state
    Pod {
        #[command(subcommand)]
        cmd: PodCmd,
    },
    /// View persisted state
    State {
        #[command(subcommand)]
        cmd: StateCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// List IDs of the target and previous configurations
    List,
    /// Display a specified configuration
    Show { config_id: String },
    /// Display the target configuration
    Target,
    /// Display the target configuration ID
    TargetId,
}

#[derive(Subcommand, Debug)]
pub enum StateCmd {
    /// Display the framework ID
    FrameworkId,
    /// List names of all custom properties
    Properties,
    /// Display the content of a specified property
    Property { name: String },
    /// Refresh the state cache (for debugging)
    RefreshCache,
}

pub async fn run_debug(ctx: &Context, cmd: DebugCmd) -> CliResult<()> {
    let client = &ctx.service;
    match cmd {
        DebugCmd::Config { cmd } => {
            let q = &ctx.queries.config;
            match cmd {
                ConfigCmd::List => q.list(client).await,
                ConfigCmd::Show { config_id } => q.show(client, &config_id).await,
                ConfigCmd::Target => q.target(client).await,
                ConfigCmd::TargetId => q.target_id(client).await,
            }
        }
        DebugCmd::Pod { cmd } => run_pod(ctx, cmd).await,
        DebugCmd::State { cmd } => {
            let q = &ctx.queries.state;
            match cmd {
                StateCmd::FrameworkId => q.framework_id(client).await,
                StateCmd::Properties => q.property_list(client).await,
                StateCmd::Property { name } => q.property(client, &name).await,
                StateCmd::RefreshCache => q.refresh_cache(client).await,
            }
        }
    }
}
