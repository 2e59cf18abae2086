//! Query families for the service API.
//!
//! Run-scoped families carry a `prefix_cb` slot. At startup the same
//! [`PrefixSupplier`] is installed into each of them, and it is consulted on
//! every request, so a missing `--run` only fails commands that actually hit
//! a run-scoped endpoint.

pub mod config;
pub mod endpoints;
pub mod package;
pub mod plan;
pub mod pod;
pub mod state;

use std::sync::Arc;

use crate::error::CliResult;
use crate::run_name::PrefixSupplier;

pub use config::ConfigQueries;
pub use endpoints::EndpointsQueries;
pub use package::PackageQueries;
pub use plan::PlanQueries;
pub use pod::PodQueries;
pub use state::StateQueries;

pub type PrefixCb = Option<Arc<dyn PrefixSupplier>>;

const DEFAULT_PREFIX: &str = "v1/";

/// Joins `tail` onto the installed prefix, or onto `v1/` when none is set.
pub fn resolve_path(prefix_cb: &PrefixCb, tail: &str) -> CliResult<String> {
    let prefix = match prefix_cb {
        Some(cb) => cb.prefix()?,
        None => DEFAULT_PREFIX.to_string(),
    };
    Ok(format!("{}{}", prefix, tail))
}

pub struct Queries {
    pub config: ConfigQueries,
    pub endpoints: EndpointsQueries,
    pub package: PackageQueries,
    pub plan: PlanQueries,
    pub pod: PodQueries,
    pub state: StateQueries,
}

impl Queries {
    /// Builds every family and installs `supplier` into the run-scoped ones.
    /// Package queries go to the package manager and stay unscoped.
    pub fn new(supplier: Arc<dyn PrefixSupplier>, service_name: &str) -> Self {
        let mut config = ConfigQueries::new();
        config.prefix_cb = Some(supplier.clone());
        let mut endpoints = EndpointsQueries::new();
        endpoints.prefix_cb = Some(supplier.clone());
        let package = PackageQueries::new(service_name);
        let mut plan = PlanQueries::new();
        plan.prefix_cb = Some(supplier.clone());
        let mut pod = PodQueries::new();
        pod.prefix_cb = Some(supplier.clone());
        let mut state = StateQueries::new();
        state.prefix_cb = Some(supplier);

        Self {
            config,
            endpoints,
            package,
            plan,
            pod,
            state,
        }
    }
}
