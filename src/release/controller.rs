// ABOUTME: Release controller driving deploy -> verify -> rollback -> verify.
// ABOUTME: Wires provider, probe, and sleeper into the typestate release.

use crate::clock::Sleeper;
use crate::health::HealthProbe;
use crate::provider::{DeployTrigger, DeploymentHistory, EndpointLookup, RollbackExecutor};
use crate::types::{ServiceEndpoint, ServiceId};

use super::approval::ApprovalGate;
use super::error::ReleaseError;
use super::machine::{Release, Step};
use super::outcome::ReleaseReport;
use super::policy::ReleasePolicy;
use super::trace::{ApiCall, ReleaseTrace};

/// Owns the collaborators for release runs against one provider.
///
/// A run is strictly sequential: one verification pass, at most one restore,
/// one re-verification pass. Releases for the same service must not run
/// concurrently; serializing them is the caller's job.
#[derive(Debug)]
pub struct ReleaseController<P, H, Z> {
    provider: P,
    probe: H,
    sleeper: Z,
    policy: ReleasePolicy,
    endpoint: Option<ServiceEndpoint>,
}

impl<P, H, Z> ReleaseController<P, H, Z>
where
    P: EndpointLookup + DeploymentHistory + RollbackExecutor,
    H: HealthProbe,
    Z: Sleeper,
{
    pub fn new(provider: P, probe: H, sleeper: Z, policy: ReleasePolicy) -> Self {
        Self {
            provider,
            probe,
            sleeper,
            policy,
            endpoint: None,
        }
    }

    /// Probe this endpoint instead of asking the provider for it.
    pub fn with_endpoint(mut self, endpoint: ServiceEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> &ReleasePolicy {
        &self.policy
    }

    /// Await approval, then run the release.
    pub async fn release<A: ApprovalGate + ?Sized>(
        &self,
        service: &ServiceId,
        gate: &A,
    ) -> Result<ReleaseReport, ReleaseError> {
        self.await_approval(service, gate).await?;
        Ok(self.run(service).await)
    }

    /// Await approval, trigger the deploy, then run the release.
    pub async fn trigger_and_release<A, T>(
        &self,
        service: &ServiceId,
        gate: &A,
        trigger: &T,
    ) -> Result<ReleaseReport, ReleaseError>
    where
        A: ApprovalGate + ?Sized,
        T: DeployTrigger + ?Sized,
    {
        self.await_approval(service, gate).await?;

        let mut trace = ReleaseTrace::default();
        match trigger.trigger_deploy(service).await {
            Ok(deployment) => {
                trace.api_call(
                    ApiCall::TriggerDeploy,
                    true,
                    format!("{} ({})", deployment.id, deployment.short_commit()),
                );
            }
            Err(source) => {
                trace.api_call(ApiCall::TriggerDeploy, false, source.to_string());
                return Err(ReleaseError::Trigger { source, trace });
            }
        }

        Ok(self.run_with_trace(service, trace).await)
    }

    async fn await_approval<A: ApprovalGate + ?Sized>(
        &self,
        service: &ServiceId,
        gate: &A,
    ) -> Result<(), ReleaseError> {
        tracing::info!(%service, "awaiting release approval");
        gate.await_approval(service).await?;
        tracing::info!(%service, "release approved");
        Ok(())
    }

    /// Run the state machine for a deployment that has already been triggered.
    ///
    /// Always produces a terminal outcome.
    pub async fn run(&self, service: &ServiceId) -> ReleaseReport {
        self.run_with_trace(service, ReleaseTrace::default()).await
    }

    async fn run_with_trace(&self, service: &ServiceId, trace: ReleaseTrace) -> ReleaseReport {
        let release = Release::with_trace(
            service.clone(),
            self.policy.clone(),
            self.endpoint.clone(),
            trace,
        );

        let release = release.begin().stabilize(&self.sleeper).await;

        let release = match release
            .check_health(&self.provider, &self.probe, &self.sleeper)
            .await
        {
            Step::Continue(unhealthy) => unhealthy,
            Step::Done(report) => return report,
        };

        let release = match release.begin_rollback().resolve_target(&self.provider).await {
            Step::Continue(rolling_back) => rolling_back,
            Step::Done(report) => return report,
        };

        let release = match release.restore(&self.provider).await {
            Step::Continue(settling) => settling,
            Step::Done(report) => return report,
        };

        release
            .settle(&self.sleeper)
            .await
            .verify(&self.provider, &self.probe, &self.sleeper)
            .await
    }
}
