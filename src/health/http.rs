// ABOUTME: HTTP GET health probe with a hard per-attempt timeout.
// ABOUTME: Any 2xx response within the timeout counts as healthy. Redirects are not followed.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

use super::{HealthCheckResult, HealthProbe};
use crate::types::ServiceEndpoint;

/// Probes `GET <endpoint><path>`.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    path: String,
}

impl HttpProbe {
    pub fn new(path: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("rollguard-probe/", env!("CARGO_PKG_VERSION")))
            // A 3xx is reported as-is and counts as unhealthy.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            path: path.into(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(
        &self,
        endpoint: &ServiceEndpoint,
        attempt: u32,
        timeout: Duration,
    ) -> HealthCheckResult {
        let url = endpoint.health_url(&self.path);
        let started = Instant::now();

        let response = tokio::time::timeout(timeout, self.client.get(&url).send()).await;
        let latency = started.elapsed();

        match response {
            Ok(Ok(resp)) if resp.status().is_success() => {
                tracing::debug!(
                    %url,
                    attempt,
                    status = %resp.status(),
                    ?latency,
                    "health probe passed"
                );
                HealthCheckResult::passed(attempt, latency, format!("HTTP {}", resp.status()))
            }
            Ok(Ok(resp)) => {
                tracing::debug!(%url, attempt, status = %resp.status(), "health probe non-2xx");
                HealthCheckResult::failed(
                    attempt,
                    Some(latency),
                    format!("HTTP {}", resp.status()),
                )
            }
            Ok(Err(e)) => {
                tracing::debug!(%url, attempt, error = %e, "health probe request failed");
                HealthCheckResult::failed(attempt, None, e.to_string())
            }
            Err(_elapsed) => {
                tracing::debug!(%url, attempt, "health probe timed out");
                HealthCheckResult::failed(
                    attempt,
                    None,
                    format!("timed out after {}ms", timeout.as_millis()),
                )
            }
        }
    }
}
