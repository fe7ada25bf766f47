// ABOUTME: Single-attempt health probes against a service endpoint.
// ABOUTME: Probes never fail; every outcome is reported as a HealthCheckResult.

mod http;

pub use http::HttpProbe;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::types::ServiceEndpoint;

/// Outcome of one health check attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    /// 1-based attempt number within one verification pass.
    pub attempt: u32,
    pub at: DateTime<Utc>,
    pub success: bool,
    /// Round-trip time when a response was received.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,
    /// Status line or error description.
    pub detail: String,
}

impl HealthCheckResult {
    pub fn passed(attempt: u32, latency: Duration, detail: impl Into<String>) -> Self {
        Self {
            attempt,
            at: Utc::now(),
            success: true,
            latency: Some(latency),
            detail: detail.into(),
        }
    }

    pub fn failed(attempt: u32, latency: Option<Duration>, detail: impl Into<String>) -> Self {
        Self {
            attempt,
            at: Utc::now(),
            success: false,
            latency,
            detail: detail.into(),
        }
    }
}

/// Issues a single bounded health check.
///
/// Implementations must absorb every error (network, status, timeout) into a
/// failed result; retrying is the caller's job.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(
        &self,
        endpoint: &ServiceEndpoint,
        attempt: u32,
        timeout: Duration,
    ) -> HealthCheckResult;
}
