use std::fs;

use crate::error::{CliError, CliResult};
use crate::http_client::Client;
use crate::output::{print_json_bytes, print_json_value};

const DESCRIBE_REQUEST: &str =
    "application/vnd.dcos.service.describe-request+json;charset=utf-8;version=v1";
const UPDATE_REQUEST: &str =
    "application/vnd.dcos.service.update-request+json;charset=utf-8;version=v1";

/// Package manager queries about the installed service. These are not
/// scoped to a run and never consult `--run`.
pub struct PackageQueries {
    app_id: String,
}

impl PackageQueries {
    pub fn new(service_name: &str) -> Self {
        Self {
            app_id: format!("/{}", service_name.trim_matches('/')),
        }
    }

    pub async fn describe(&self, client: &Client) -> CliResult<()> {
        let bytes = self.fetch_description(client).await?;
        print_json_bytes(&bytes)
    }

    pub async fn package_versions(&self, client: &Client) -> CliResult<()> {
        let bytes = self.fetch_description(client).await?;
        let v: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Response(format!("package description is not JSON: {}", e)))?;
        print_json_value(&package_versions(&v))
    }

    pub async fn update(
        &self,
        client: &Client,
        options_file: Option<&str>,
        package_version: Option<&str>,
    ) -> CliResult<()> {
        let mut body = serde_json::Map::new();
        body.insert("appId".to_string(), self.app_id.clone().into());
        if let Some(version) = package_version {
            body.insert("packageVersion".to_string(), version.into());
        }
        if let Some(path) = options_file {
            body.insert("options".to_string(), read_options(path)?);
        }
        let payload = serde_json::Value::Object(body).to_string().into_bytes();
        let bytes = client
            .post_data("service/update", payload, UPDATE_REQUEST)
            .await?;
        print_json_bytes(&bytes)
    }

    async fn fetch_description(&self, client: &Client) -> CliResult<Vec<u8>> {
        let payload = serde_json::json!({ "appId": self.app_id })
            .to_string()
            .into_bytes();
        Ok(client
            .post_data("service/describe", payload, DESCRIBE_REQUEST)
            .await?)
    }
}

fn package_versions(description: &serde_json::Value) -> serde_json::Value {
    let pick = |key: &str| {
        description
            .get(key)
            .cloned()
            .unwrap_or_else(|| serde_json::json!([]))
    };
    serde_json::json!({
        "upgradesTo": pick("upgradesTo"),
        "downgradesTo": pick("downgradesTo"),
    })
}

fn read_options(path: &str) -> CliResult<serde_json::Value> {
    let bytes = fs::read(path).map_err(|e| CliError::ReadInput {
        source_desc: format!("options file {}", path),
        source: e,
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CliError::Usage(format!("Invalid JSON in options file {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_id_is_rooted() {
        assert_eq!(PackageQueries::new("queue").app_id, "/queue");
        assert_eq!(PackageQueries::new("/team/queue/").app_id, "/team/queue");
    }

    #[test]
    fn versions_default_to_empty_lists() {
        let v = package_versions(&serde_json::json!({"upgradesTo": ["2.0.0"]}));
        assert_eq!(
            v,
            serde_json::json!({"upgradesTo": ["2.0.0"], "downgradesTo": []})
        );
    }

    #[test]
    fn options_must_be_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("options.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_options(path.to_str().unwrap()),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            read_options(tmp.path().join("missing.json").to_str().unwrap()),
            Err(CliError::ReadInput { .. })
        ));
    }
}
