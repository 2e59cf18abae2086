use crate::error::CliResult;
use crate::http_client::Client;
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

use super::{resolve_path, PrefixCb};

#[derive(Default)]
pub struct EndpointsQueries {
    pub prefix_cb: PrefixCb,
}

impl EndpointsQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn path(&self, tail: &str) -> CliResult<String> {
        resolve_path(&self.prefix_cb, tail)
    }

    /// Lists endpoint names, or shows one endpoint when `name` is given.
    pub async fn show(&self, client: &Client, name: Option<&str>) -> CliResult<()> {
        let tail = match name {
            Some(n) => format!("endpoints/{}", encode_segment(n)?),
            None => "endpoints".to_string(),
        };
        let bytes = client.get(&self.path(&tail)?).await?;
        print_json_bytes(&bytes)
    }
}
