use crate::error::CliResult;
use crate::http_client::Client;
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

use super::{resolve_path, PrefixCb};

/// Persisted scheduler state (`debug state`).
#[derive(Default)]
pub struct StateQueries {
    pub prefix_cb: PrefixCb,
}

impl StateQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn path(&self, tail: &str) -> CliResult<String> {
        resolve_path(&self.prefix_cb, tail)
    }

    pub async fn framework_id(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("state/frameworkId")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn property_list(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("state/properties")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn property(&self, client: &Client, name: &str) -> CliResult<()> {
        let path = self.path(&format!("state/properties/{}", encode_segment(name)?))?;
        let bytes = client.get(&path).await?;
        print_json_bytes(&bytes)
    }

    pub async fn refresh_cache(&self, client: &Client) -> CliResult<()> {
        let bytes = client.put(&self.path("state/refresh")?).await?;
        print_json_bytes(&bytes)
    }
}
