use crate::error::CliResult;
use crate::http_client::Client;
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

use super::{resolve_path, PrefixCb};

/// Service configuration history (`debug config`).
#[derive(Default)]
pub struct ConfigQueries {
    pub prefix_cb: PrefixCb,
}

impl ConfigQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn path(&self, tail: &str) -> CliResult<String> {
        resolve_path(&self.prefix_cb, tail)
    }

    pub async fn list(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("configurations")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn show(&self, client: &Client, config_id: &str) -> CliResult<()> {
        let path = self.path(&format!("configurations/{}", encode_segment(config_id)?))?;
        let bytes = client.get(&path).await?;
        print_json_bytes(&bytes)
    }

    pub async fn target(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("configurations/target")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn target_id(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("configurations/targetId")?).await?;
        print_json_bytes(&bytes)
    }
}
