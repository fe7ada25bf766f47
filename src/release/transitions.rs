// ABOUTME: State transition methods for the release state machine.
// ABOUTME: Each method consumes self and either continues or concludes the run.

use crate::clock::Sleeper;
use crate::health::HealthProbe;
use crate::provider::{
    DeploymentHistory, DeploymentRecord, EndpointLookup, ProviderError, RollbackExecutor,
};
use crate::types::ServiceEndpoint;

use super::machine::{Release, Step};
use super::outcome::{ReleaseOutcome, ReleaseReport};
use super::state::{
    Deploying, HealthChecking, ResolvingRollbackTarget, RollingBack, Settling, Stabilizing,
    StateMarker, Unhealthy, VerifyingRollback,
};
use super::target::find_rollback_target;
use super::trace::ApiCall;

/// How a bounded verification pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollVerdict {
    Healthy,
    Exhausted,
    AuthAborted,
}

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S: StateMarker> Release<S> {
    /// Return the endpoint, looking it up if it has not been resolved yet.
    ///
    /// `Ok(None)` means the lookup failed for a non-auth reason; the caller
    /// counts the attempt as failed and the lookup is retried next attempt.
    async fn resolve_endpoint<L: EndpointLookup>(
        &mut self,
        lookup: &L,
    ) -> Result<Option<ServiceEndpoint>, ProviderError> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(Some(endpoint.clone()));
        }

        match lookup.service_endpoint(&self.service).await {
            Ok(endpoint) => {
                self.trace
                    .api_call(ApiCall::GetServiceEndpoint, true, endpoint.to_string());
                self.endpoint = Some(endpoint.clone());
                Ok(Some(endpoint))
            }
            Err(e) if e.is_auth() => {
                self.trace
                    .api_call(ApiCall::GetServiceEndpoint, false, e.to_string());
                Err(e)
            }
            Err(e) => {
                self.trace
                    .api_call(ApiCall::GetServiceEndpoint, false, e.to_string());
                Ok(None)
            }
        }
    }

    /// Probe up to `max_attempts` times with a fixed interval between attempts.
    async fn poll_health<L, H, Z>(&mut self, lookup: &L, probe: &H, sleeper: &Z) -> PollVerdict
    where
        L: EndpointLookup,
        H: HealthProbe,
        Z: Sleeper,
    {
        let state = self.state.state();
        let max_attempts = self.policy.max_attempts.get();
        let interval = self.policy.interval;

        for attempt in 1..=max_attempts {
            match self.resolve_endpoint(lookup).await {
                Ok(Some(endpoint)) => {
                    let result = probe
                        .probe(&endpoint, attempt, self.policy.attempt_timeout)
                        .await;
                    let success = result.success;
                    self.trace.probe(state, result);
                    if success {
                        return PollVerdict::Healthy;
                    }
                }
                Ok(None) => {}
                Err(_) => return PollVerdict::AuthAborted,
            }

            if attempt < max_attempts {
                sleeper.sleep(interval).await;
                self.trace.waited(state, interval);
            }
        }

        tracing::warn!(
            service = %self.service,
            attempts = max_attempts,
            %state,
            "health checks exhausted"
        );
        PollVerdict::Exhausted
    }
}

// =============================================================================
// Deploying -> Stabilizing -> HealthChecking
// =============================================================================

impl Release<Deploying> {
    /// Hand the triggered deployment over to the controller.
    pub fn begin(self) -> Release<Stabilizing> {
        self.transition(Stabilizing)
    }
}

impl Release<Stabilizing> {
    /// Wait for the new deployment to finish starting. No probes are issued.
    pub async fn stabilize<Z: Sleeper>(mut self, sleeper: &Z) -> Release<HealthChecking> {
        let delay = self.policy.stabilization_delay;
        sleeper.sleep(delay).await;
        self.trace.waited(self.state.state(), delay);
        self.transition(HealthChecking)
    }
}

// =============================================================================
// HealthChecking -> Healthy | Unhealthy
// =============================================================================

impl Release<HealthChecking> {
    /// Probe the new deployment.
    ///
    /// Concludes with `Healthy` on the first passing attempt, or with
    /// `AbortedAuthError` if the endpoint lookup is refused.
    #[must_use = "release state must be used"]
    pub async fn check_health<L, H, Z>(
        mut self,
        lookup: &L,
        probe: &H,
        sleeper: &Z,
    ) -> Step<Unhealthy>
    where
        L: EndpointLookup,
        H: HealthProbe,
        Z: Sleeper,
    {
        match self.poll_health(lookup, probe, sleeper).await {
            PollVerdict::Healthy => Step::Done(self.conclude(ReleaseOutcome::Healthy, None)),
            PollVerdict::Exhausted => Step::Continue(self.transition(Unhealthy)),
            PollVerdict::AuthAborted => {
                Step::Done(self.conclude(ReleaseOutcome::AbortedAuthError, None))
            }
        }
    }
}

// =============================================================================
// Unhealthy -> ResolvingRollbackTarget -> RollingBack | NoPriorDeployment
// =============================================================================

impl Release<Unhealthy> {
    pub fn begin_rollback(self) -> Release<ResolvingRollbackTarget> {
        self.transition(ResolvingRollbackTarget)
    }
}

impl Release<ResolvingRollbackTarget> {
    /// Fetch the deployment history and pick the deployment to restore.
    #[must_use = "release state must be used"]
    pub async fn resolve_target<D: DeploymentHistory>(mut self, history: &D) -> Step<RollingBack> {
        let deployments = match history.list_deployments(&self.service).await {
            Ok(deployments) => {
                self.trace.api_call(
                    ApiCall::ListDeployments,
                    true,
                    format!("{} deployments", deployments.len()),
                );
                deployments
            }
            Err(e) => {
                self.trace
                    .api_call(ApiCall::ListDeployments, false, e.to_string());
                let outcome = if e.is_auth() {
                    ReleaseOutcome::AbortedAuthError
                } else {
                    ReleaseOutcome::RollbackFailed
                };
                return Step::Done(self.conclude(outcome, None));
            }
        };

        match find_rollback_target(&deployments, self.policy.target_policy) {
            Ok(target) => {
                tracing::info!(
                    service = %self.service,
                    target = %target.id,
                    commit = %target.short_commit(),
                    "rollback target resolved"
                );
                Step::Continue(self.transition(RollingBack { target }))
            }
            Err(e) => {
                tracing::error!(service = %self.service, error = %e, "cannot roll back");
                Step::Done(self.conclude(ReleaseOutcome::NoPriorDeployment, None))
            }
        }
    }
}

// =============================================================================
// RollingBack -> Settling | RollbackFailed
// =============================================================================

impl Release<RollingBack> {
    pub fn target(&self) -> &DeploymentRecord {
        &self.state.target
    }

    /// Ask the provider to restore the target. Only acceptance is checked.
    #[must_use = "release state must be used"]
    pub async fn restore<E: RollbackExecutor>(mut self, executor: &E) -> Step<Settling> {
        let target = self.state.target.clone();

        match executor.restore_deployment(&self.service, &target.id).await {
            Ok(()) => {
                self.trace.api_call(
                    ApiCall::RestoreDeployment,
                    true,
                    format!("restore of {} accepted", target.id),
                );
                Step::Continue(self.transition(Settling { target }))
            }
            Err(e) => {
                self.trace
                    .api_call(ApiCall::RestoreDeployment, false, e.to_string());
                let outcome = if e.is_auth() {
                    ReleaseOutcome::AbortedAuthError
                } else {
                    ReleaseOutcome::RollbackFailed
                };
                Step::Done(self.conclude(outcome, Some(target)))
            }
        }
    }
}

// =============================================================================
// Settling -> VerifyingRollback -> RollbackVerified | RollbackFailed
// =============================================================================

impl Release<Settling> {
    /// Wait for the restore to take effect. No probes are issued.
    pub async fn settle<Z: Sleeper>(mut self, sleeper: &Z) -> Release<VerifyingRollback> {
        let delay = self.policy.settle_delay;
        sleeper.sleep(delay).await;
        self.trace.waited(self.state.state(), delay);
        let target = self.state.target.clone();
        self.transition(VerifyingRollback { target })
    }
}

impl Release<VerifyingRollback> {
    /// Probe the restored deployment. Always terminal.
    #[must_use = "release report must be used"]
    pub async fn verify<L, H, Z>(mut self, lookup: &L, probe: &H, sleeper: &Z) -> ReleaseReport
    where
        L: EndpointLookup,
        H: HealthProbe,
        Z: Sleeper,
    {
        let verdict = self.poll_health(lookup, probe, sleeper).await;
        let target = self.state.target.clone();
        let outcome = match verdict {
            PollVerdict::Healthy => ReleaseOutcome::RollbackVerified,
            PollVerdict::Exhausted => ReleaseOutcome::RollbackFailed,
            PollVerdict::AuthAborted => ReleaseOutcome::AbortedAuthError,
        };
        self.conclude(outcome, Some(target))
    }
}
