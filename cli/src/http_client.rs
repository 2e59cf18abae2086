use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::run_name::encode_segment;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid request path {path}: {message}")]
    InvalidPath { path: String, message: String },

    #[error("Request failed: {method} {url}: {source}")]
    Request {
        method: Method,
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {method} {url} status={status} body={body}")]
    Status {
        method: Method,
        url: Url,
        status: u16,
        body: String,
    },
}

/// One HTTP API surface (the queue service or the package manager). Paths
/// passed to the request methods are relative to `base_url`.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(base_url: Url, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("token={}", token))
                .context("Auth token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("runqctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.send(Method::DELETE, path, None).await
    }

    pub async fn put(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.send(Method::PUT, path, None).await
    }

    pub async fn post(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.send(Method::POST, path, None).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        self.post_data(path, body.to_string().into_bytes(), "application/json").await
    }

    /// POSTs a pre-encoded body. `content_type` is sent verbatim, which for
    /// multipart bodies carries the boundary.
    pub async fn post_data(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, TransportError> {
        self.send(Method::POST, path, Some((body, content_type))).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<(Vec<u8>, &str)>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::InvalidPath {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut req = self.http.request(method.clone(), url.clone());
        if let Some((bytes, content_type)) = body {
            debug!(%method, %url, body_len = bytes.len(), content_type, "sending request");
            req = req.header(CONTENT_TYPE, content_type).body(bytes);
        } else {
            debug!(%method, %url, "sending request");
        }

        let resp = req.send().await.map_err(|source| TransportError::Request {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;
        debug!(%method, %url, status = status.as_u16(), len = bytes.len(), "response");

        if !status.is_success() {
            return Err(TransportError::Status {
                method,
                url,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).trim().to_string(),
            });
        }
        Ok(bytes.to_vec())
    }
}

fn root_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(&format!("{}/", trimmed)).with_context(|| format!("Invalid base URL {}", base_url))
}

/// `<base>/service/<name>/`: where the queue service's own API lives.
pub fn service_url(base_url: &str, service_name: &str) -> Result<Url> {
    let name = service_name
        .trim_matches('/')
        .split('/')
        .map(encode_segment)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid service name {}", service_name))?
        .join("/");
    root_url(base_url)?
        .join(&format!("service/{}/", name))
        .with_context(|| format!("Invalid service name {}", service_name))
}

/// `<base>/cosmos/`: the package manager, which is not scoped to any run.
pub fn package_url(base_url: &str) -> Result<Url> {
    root_url(base_url)?
        .join("cosmos/")
        .context("Invalid package manager URL")
}
