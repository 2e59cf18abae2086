use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::{CliError, CliResult};
use crate::http_client::{Client, TransportError};
use crate::output::print_json_bytes;
use crate::run_name::encode_segment;

use super::{resolve_path, PrefixCb};

pub const DEFAULT_PLAN: &str = "deploy";

#[derive(Default)]
pub struct PlanQueries {
    pub prefix_cb: PrefixCb,
}

impl PlanQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn path(&self, tail: &str) -> CliResult<String> {
        resolve_path(&self.prefix_cb, tail)
    }

    fn plan_path(&self, plan: &str, action: Option<&str>) -> CliResult<String> {
        let tail = match action {
            Some(a) => format!("plans/{}/{}", encode_segment(plan)?, a),
            None => format!("plans/{}", encode_segment(plan)?),
        };
        self.path(&tail)
    }

    pub async fn list(&self, client: &Client) -> CliResult<()> {
        let bytes = client.get(&self.path("plans")?).await?;
        print_json_bytes(&bytes)
    }

    /// Incomplete plans are answered with 417 or 503 and still carry the
    /// plan as the body, so those are printed rather than failed.
    pub async fn show(&self, client: &Client, plan: &str) -> CliResult<()> {
        match client.get(&self.plan_path(plan, None)?).await {
            Ok(bytes) => print_json_bytes(&bytes),
            Err(TransportError::Status { status, body, .. })
                if (status == 417 || status == 503) && !body.is_empty() =>
            {
                print_json_bytes(body.as_bytes())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn start(&self, client: &Client, plan: &str, params: &[String]) -> CliResult<()> {
        let body = serde_json::Value::Object(
            parse_params(params)?
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
        );
        let bytes = client
            .post_json(&self.plan_path(plan, Some("start"))?, &body)
            .await?;
        print_json_bytes(&bytes)
    }

    pub async fn stop(&self, client: &Client, plan: &str) -> CliResult<()> {
        let bytes = client.post(&self.plan_path(plan, Some("stop"))?).await?;
        print_json_bytes(&bytes)
    }

    pub async fn pause(&self, client: &Client, plan: &str, phase: Option<&str>) -> CliResult<()> {
        self.phase_action(client, plan, "interrupt", phase).await
    }

    pub async fn resume(&self, client: &Client, plan: &str, phase: Option<&str>) -> CliResult<()> {
        self.phase_action(client, plan, "continue", phase).await
    }

    pub async fn force_restart(
        &self,
        client: &Client,
        plan: &str,
        phase: Option<&str>,
        step: Option<&str>,
    ) -> CliResult<()> {
        if step.is_some() && phase.is_none() {
            return Err(CliError::Usage(
                "force-restart needs a phase when a step is given".to_string(),
            ));
        }
        let path = with_query(
            self.plan_path(plan, Some("restart"))?,
            &[("phase", phase), ("step", step)],
        );
        let bytes = client.post(&path).await?;
        print_json_bytes(&bytes)
    }

    pub async fn force_complete(
        &self,
        client: &Client,
        plan: &str,
        phase: &str,
        step: &str,
    ) -> CliResult<()> {
        let path = with_query(
            self.plan_path(plan, Some("forceComplete"))?,
            &[("phase", Some(phase)), ("step", Some(step))],
        );
        let bytes = client.post(&path).await?;
        print_json_bytes(&bytes)
    }

    async fn phase_action(
        &self,
        client: &Client,
        plan: &str,
        action: &str,
        phase: Option<&str>,
    ) -> CliResult<()> {
        let path = self.plan_path(plan, Some(action))?;
        let bytes = match phase {
            Some(p) => {
                client
                    .post_json(&path, &serde_json::json!({ "phase": p }))
                    .await?
            }
            None => client.post(&path).await?,
        };
        print_json_bytes(&bytes)
    }
}

/// Parses repeated `key=value` plan parameters.
pub fn parse_params(params: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for entry in params {
        let (k, v) = entry.split_once('=').ok_or_else(|| {
            CliError::Usage(format!(
                "invalid parameter '{}', expected key=value",
                entry
            ))
        })?;
        if k.trim().is_empty() {
            return Err(CliError::Usage(format!(
                "invalid parameter '{}': key cannot be empty",
                entry
            )));
        }
        out.insert(k.trim().to_string(), v.to_string());
    }
    Ok(out)
}

fn with_query(path: String, params: &[(&str, Option<&str>)]) -> String {
    let query = params
        .iter()
        .filter_map(|(k, v)| {
            v.map(|v| format!("{}={}", k, utf8_percent_encode(v, NON_ALPHANUMERIC)))
        })
        .collect::<Vec<_>>();
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_key_value_pairs() {
        let params = parse_params(&["A=1".to_string(), " B =x=y".to_string()]).unwrap();
        assert_eq!(params.get("A").map(String::as_str), Some("1"));
        assert_eq!(params.get("B").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn params_reject_missing_separator_or_key() {
        assert!(matches!(
            parse_params(&["novalue".to_string()]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_params(&["=v".to_string()]),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn query_skips_absent_values() {
        assert_eq!(
            with_query(
                "v1/plans/deploy/restart".into(),
                &[("phase", Some("p 1")), ("step", None)]
            ),
            "v1/plans/deploy/restart?phase=p%201"
        );
        assert_eq!(
            with_query("v1/plans/deploy/restart".into(), &[("phase", None)]),
            "v1/plans/deploy/restart"
        );
    }
}
