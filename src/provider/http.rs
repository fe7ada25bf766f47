// ABOUTME: REST client for the hosting provider's management API.
// ABOUTME: Implements the provider capability traits over reqwest with bearer auth.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::time::Duration;

use super::error::{ProviderError, TransportSnafu};
use super::record::DeploymentRecord;
use super::traits::{DeployTrigger, DeploymentHistory, EndpointLookup, RollbackExecutor};
use crate::types::{DeploymentId, ServiceEndpoint, ServiceId};

const USER_AGENT: &str = concat!("rollguard/", env!("CARGO_PKG_VERSION"));

/// Client for the provider API rooted at `api_url`.
pub struct HttpProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    url: String,
}

impl HttpProvider {
    /// Create a client. `request_timeout` bounds every API call.
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .context(TransportSnafu)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build a URL from percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> String {
        let path: Vec<_> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}", self.api_url, path.join("/"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        let body = response.text().await.context(TransportSnafu)?;
        check_status(status, body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
            message: e.to_string(),
        })
    }
}

/// Map an HTTP status to success or a typed provider error.
pub(crate) fn check_status(status: StatusCode, body: String) -> Result<String, ProviderError> {
    if status.is_success() {
        return Ok(body);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Unauthorized {
            status: status.as_u16(),
        }),
        _ => Err(ProviderError::Rejected {
            status: status.as_u16(),
            body: truncate(body.trim(), 200),
        }),
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[async_trait]
impl EndpointLookup for HttpProvider {
    async fn service_endpoint(
        &self,
        service: &ServiceId,
    ) -> Result<ServiceEndpoint, ProviderError> {
        let url = self.url(&["services", service.as_str()]);
        let response: ServiceResponse = self.send_json(self.client.get(url)).await?;

        ServiceEndpoint::parse(&response.url).map_err(|e| ProviderError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DeploymentHistory for HttpProvider {
    async fn list_deployments(
        &self,
        service: &ServiceId,
    ) -> Result<Vec<DeploymentRecord>, ProviderError> {
        let url = self.url(&["services", service.as_str(), "deployments"]);
        self.send_json(self.client.get(url)).await
    }
}

#[async_trait]
impl RollbackExecutor for HttpProvider {
    async fn restore_deployment(
        &self,
        service: &ServiceId,
        deployment: &DeploymentId,
    ) -> Result<(), ProviderError> {
        let url = self.url(&[
            "services",
            service.as_str(),
            "deployments",
            deployment.as_str(),
            "restore",
        ]);
        self.send(self.client.post(url)).await.map(|_| ())
    }
}

#[async_trait]
impl DeployTrigger for HttpProvider {
    async fn trigger_deploy(&self, service: &ServiceId) -> Result<DeploymentRecord, ProviderError> {
        let url = self.url(&["services", service.as_str(), "deployments"]);
        self.send_json(self.client.post(url)).await
    }
}
