// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and in-memory fakes for the provider, probe, and sleeper.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rollguard::clock::Sleeper;
use rollguard::health::{HealthCheckResult, HealthProbe};
use rollguard::provider::{
    DeployTrigger, DeploymentHistory, DeploymentRecord, DeploymentStatus, EndpointLookup,
    ProviderError, RollbackExecutor,
};
use rollguard::release::ReleasePolicy;
use rollguard::types::{DeploymentId, ServiceEndpoint, ServiceId};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("rollguard=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn service() -> ServiceId {
    ServiceId::new("srv-test".to_string())
}

#[allow(dead_code)]
pub fn endpoint() -> ServiceEndpoint {
    ServiceEndpoint::parse("https://app.example.com").unwrap()
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A deployment created `minutes_ago` before a fixed reference time.
#[allow(dead_code)]
pub fn deployment(id: &str, status: DeploymentStatus, minutes_ago: i64) -> DeploymentRecord {
    DeploymentRecord {
        id: DeploymentId::new(id.to_string()),
        status,
        commit_ref: format!("{id}0123456789abcdef"),
        created_at: base_time() - chrono::Duration::minutes(minutes_ago),
    }
}

/// History `[D0 live, D1 live, D2 superseded]`, most recent first.
#[allow(dead_code)]
pub fn standard_history() -> Vec<DeploymentRecord> {
    vec![
        deployment("dep-0", DeploymentStatus::Live, 0),
        deployment("dep-1", DeploymentStatus::Live, 60),
        deployment("dep-2", DeploymentStatus::Superseded, 120),
    ]
}

/// Policy with recognizable delays; fakes never really sleep.
#[allow(dead_code)]
pub fn policy(max_attempts: u32) -> ReleasePolicy {
    ReleasePolicy {
        max_attempts: NonZeroU32::new(max_attempts).unwrap(),
        interval: Duration::from_secs(10),
        attempt_timeout: Duration::from_secs(5),
        stabilization_delay: Duration::from_secs(60),
        settle_delay: Duration::from_secs(45),
        ..ReleasePolicy::default()
    }
}

/// Scripted provider failure.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Rejected,
}

impl Failure {
    fn into_error(self) -> ProviderError {
        match self {
            Failure::Unauthorized => ProviderError::Unauthorized { status: 401 },
            Failure::Rejected => ProviderError::Rejected {
                status: 503,
                body: "service unavailable".to_string(),
            },
        }
    }
}

/// A provider call observed by the fake.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ServiceEndpoint,
    ListDeployments,
    Restore(DeploymentId),
    Trigger,
}

#[derive(Default)]
struct ProviderState {
    endpoint: Option<ServiceEndpoint>,
    endpoint_failures: VecDeque<Failure>,
    deployments: Vec<DeploymentRecord>,
    list_failure: Option<Failure>,
    restore_failure: Option<Failure>,
    trigger_failure: Option<Failure>,
    calls: Vec<Call>,
}

/// In-memory provider. Clones share state, so a test can keep a handle
/// while the controller owns another.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<ProviderState>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new(deployments: Vec<DeploymentRecord>) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.lock();
            state.endpoint = Some(endpoint());
            state.deployments = deployments;
        }
        provider
    }

    /// Fail the next endpoint lookups in order, then succeed.
    pub fn fail_endpoint_lookups(self, failures: impl IntoIterator<Item = Failure>) -> Self {
        self.state.lock().endpoint_failures.extend(failures);
        self
    }

    pub fn fail_list(self, failure: Failure) -> Self {
        self.state.lock().list_failure = Some(failure);
        self
    }

    pub fn fail_restore(self, failure: Failure) -> Self {
        self.state.lock().restore_failure = Some(failure);
        self
    }

    pub fn fail_trigger(self, failure: Failure) -> Self {
        self.state.lock().trigger_failure = Some(failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn restores(&self) -> Vec<DeploymentId> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Restore(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl EndpointLookup for FakeProvider {
    async fn service_endpoint(
        &self,
        _service: &ServiceId,
    ) -> Result<ServiceEndpoint, ProviderError> {
        self.record(Call::ServiceEndpoint);
        let mut state = self.state.lock();
        if let Some(failure) = state.endpoint_failures.pop_front() {
            return Err(failure.into_error());
        }
        state.endpoint.clone().ok_or(ProviderError::Rejected {
            status: 404,
            body: "no such service".to_string(),
        })
    }
}

#[async_trait]
impl DeploymentHistory for FakeProvider {
    async fn list_deployments(
        &self,
        _service: &ServiceId,
    ) -> Result<Vec<DeploymentRecord>, ProviderError> {
        self.record(Call::ListDeployments);
        let state = self.state.lock();
        match state.list_failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(state.deployments.clone()),
        }
    }
}

#[async_trait]
impl RollbackExecutor for FakeProvider {
    async fn restore_deployment(
        &self,
        _service: &ServiceId,
        deployment: &DeploymentId,
    ) -> Result<(), ProviderError> {
        self.record(Call::Restore(deployment.clone()));
        match self.state.lock().restore_failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeployTrigger for FakeProvider {
    async fn trigger_deploy(
        &self,
        _service: &ServiceId,
    ) -> Result<DeploymentRecord, ProviderError> {
        self.record(Call::Trigger);
        let mut state = self.state.lock();
        if let Some(failure) = state.trigger_failure {
            return Err(failure.into_error());
        }
        let record = deployment("dep-new", DeploymentStatus::Building, -1);
        state.deployments.insert(0, record.clone());
        Ok(record)
    }
}

#[derive(Default)]
struct ProbeState {
    script: VecDeque<bool>,
    fallback: bool,
    calls: Vec<(ServiceEndpoint, u32, Duration)>,
}

/// Probe that answers from a script, then from a fallback value.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    state: Arc<Mutex<ProbeState>>,
}

#[allow(dead_code)]
impl ScriptedProbe {
    /// Answer `script` in order, then fail forever.
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        let probe = Self::default();
        probe.state.lock().script = script.into_iter().collect();
        probe
    }

    pub fn always(success: bool) -> Self {
        let probe = Self::default();
        probe.state.lock().fallback = success;
        probe
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Attempt numbers in call order.
    pub fn attempts(&self) -> Vec<u32> {
        self.state.lock().calls.iter().map(|(_, a, _)| *a).collect()
    }

    pub fn endpoints(&self) -> Vec<ServiceEndpoint> {
        self.state.lock().calls.iter().map(|(e, _, _)| e.clone()).collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.state.lock().calls.iter().map(|(_, _, t)| *t).collect()
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(
        &self,
        endpoint: &ServiceEndpoint,
        attempt: u32,
        timeout: Duration,
    ) -> HealthCheckResult {
        let mut state = self.state.lock();
        state.calls.push((endpoint.clone(), attempt, timeout));
        let fallback = state.fallback;
        let success = state.script.pop_front().unwrap_or(fallback);
        if success {
            HealthCheckResult::passed(attempt, Duration::from_millis(5), "HTTP 200 OK")
        } else {
            HealthCheckResult::failed(attempt, None, "HTTP 503 Service Unavailable")
        }
    }
}

/// Records requested delays without sleeping.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl RecordingSleeper {
    pub fn durations(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }

    pub fn count_of(&self, duration: Duration) -> usize {
        self.slept.lock().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}
