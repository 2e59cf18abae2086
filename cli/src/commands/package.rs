use clap::Subcommand;

use super::Context;
use crate::error::CliResult;
use crate::queries::plan::DEFAULT_PLAN;

#[derive(Subcommand, Debug)]
pub enum UpdateCmd {
    /// View a list of available package versions to downgrade or upgrade to
    PackageVersions,
    /// Launch an update operation
    Start {
        /// Path to a JSON file with the new service options
        #[arg(long)]
        options: Option<String>,
        /// The desired package version
        #[arg(long)]
        package_version: Option<String>,
    },
    /// View status of a running update (requires --run)
    Status,
}

pub async fn run_describe(ctx: &Context) -> CliResult<()> {
    ctx.queries.package.describe(&ctx.package).await
}

pub async fn run_update(ctx: &Context, cmd: UpdateCmd) -> CliResult<()> {
    match cmd {
        UpdateCmd::PackageVersions => ctx.queries.package.package_versions(&ctx.package).await,
        UpdateCmd::Start {
            options,
            package_version,
        } => {
            ctx.queries
                .package
                .update(&ctx.package, options.as_deref(), package_version.as_deref())
                .await
        }
        UpdateCmd::Status => ctx.queries.plan.show(&ctx.service, DEFAULT_PLAN).await,
    }
}
