use crate::error::CliResult;
use crate::http_client::Client;
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

use super::{resolve_path, PrefixCb};

#[derive(Default)]
pub struct PodQueries {
    pub prefix_cb: PrefixCb,
}

impl PodQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn path(&self, tail: &str) -> CliResult<String> {
        resolve_path(&self.prefix_cb, tail)
    }

    fn pod_path(&self, pod: &str, action: &str) -> CliResult<String> {
        self.path(&format!("pod/{}/{}", encode_segment(pod)?, action))
    }

    pub async fn list(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("pod")?).await?;
        print_json_bytes(&bytes)
    }

    /// Status of every pod, or of one pod when `pod` is given.
    pub async fn status(&self, client: &Client, pod: Option<&str>) -> CliResult<()> {
        let path = match pod {
            Some(p) => self.pod_path(p, "status")?,
            None => self.path("pod/status")?,
        };
        let bytes = client.get(&path).await?;
        print_json_bytes(&bytes)
    }

    pub async fn info(&self, client: &Client, pod: &str) -> CliResult<()> {
        let bytes = client.get(&self.pod_path(pod, "info")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn restart(&self, client: &Client, pod: &str) -> CliResult<()> {
        let bytes = client.post(&self.pod_path(pod, "restart")?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn replace(&self, client: &Client, pod: &str) -> CliResult<()> {
        let bytes = client.post(&self.pod_path(pod, "replace")?).await?;
        print_json_bytes(&bytes)
    }
}
