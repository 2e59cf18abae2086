pub mod debug;
pub mod package;
pub mod plan;
pub mod pod;
pub mod run;

use crate::http_client::Client;
use crate::queries::Queries;

/// What a command action needs: one client per API surface plus the query
/// families wired to the active run.
pub struct Context {
    pub service: Client,
    pub package: Client,
    pub queries: Queries,
}
