mod commands;
mod config;
mod error;
mod http_client;
mod multipart;
mod output;
mod queries;
mod run_name;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crate::commands::package::{run_describe, run_update, UpdateCmd};
use crate::commands::run::{run_runs, RunCmd};
use crate::commands::Context;
use crate::config::{default_config_path, Config, DEFAULT_SERVICE_NAME};
use crate::error::{CliError, CliResult};
use crate::http_client::{package_url, service_url, Client};
use crate::queries::Queries;
use crate::run_name::RunName;

#[derive(Parser, Debug)]
#[command(name = "runqctl")]
#[command(about = "Manage runs in a queue service", long_about = None)]
struct Args {
    /// Cluster base URL
    #[arg(long, env = "RUNQ_BASE_URL")]
    base_url: Option<String>,

    /// Name of the queue service
    #[arg(long, env = "RUNQ_SERVICE_NAME")]
    service_name: Option<String>,

    /// Auth token (Authorization: token=...)
    #[arg(long, env = "RUNQ_AUTH_TOKEN")]
    token: Option<String>,

    /// Load config from this path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective base URL, service name and token into config
    #[arg(long, default_value_t = false)]
    save_config: bool,

    /// HTTP timeout seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// The active Run to query
    #[arg(long, env = "RUN_NAME", value_name = "RUN_NAME", global = true)]
    run: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// View the package configuration of the queue service
    Describe,

    /// Update the queue service package
    Update {
        #[command(subcommand)]
        cmd: UpdateCmd,
    },

    /// Run management
    #[command(alias = "runs")]
    Run {
        #[command(subcommand)]
        cmd: RunCmd,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging goes to stderr; stdout carries only response JSON.
    let lvl = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(lvl)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cfg_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut cfg = Config::load(&cfg_path)?;

    // CLI args and env override config.
    let base_url = args.base_url.clone().or_else(|| cfg.base_url.clone());
    let service_name = args
        .service_name
        .clone()
        .or_else(|| cfg.service_name.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
    let token = args.token.clone().or_else(|| cfg.auth_token.clone());

    if args.save_config {
        cfg.base_url = base_url.clone();
        cfg.service_name = Some(service_name.clone());
        cfg.auth_token = token.clone();
        cfg.save(&cfg_path)?;
    }

    let Some(base_url) = base_url else {
        exit_with(CliError::Usage(
            "Missing cluster base URL (set --base-url, RUNQ_BASE_URL or base_url in config)"
                .to_string(),
        ));
    };

    let timeout = Duration::from_secs(args.timeout_secs);
    let service = Client::new(
        service_url(&base_url, &service_name)?,
        token.as_deref(),
        timeout,
    )?;
    let package = Client::new(package_url(&base_url)?, token.as_deref(), timeout)?;
    debug!(service = %service.base_url(), package = %package.base_url(), "clients ready");

    // Only validated once a run-scoped query asks for the prefix.
    let run_name = RunName::default();
    if let Some(run) = &args.run {
        run_name.set(run.as_str());
    }
    debug!(run = %run_name.get(), "active run");
    let ctx = Context {
        service,
        package,
        queries: Queries::new(Arc::new(run_name), &service_name),
    };

    match dispatch(&ctx, args.cmd).await {
        Ok(()) => Ok(()),
        Err(e) => exit_with(e),
    }
}

async fn dispatch(ctx: &Context, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Describe => run_describe(ctx).await,
        Command::Update { cmd } => run_update(ctx, cmd).await,
        Command::Run { cmd } => run_runs(ctx, cmd).await,
    }
}

/// The only place a command failure terminates the process.
fn exit_with(err: CliError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(err.exit_code());
}
