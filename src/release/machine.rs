// ABOUTME: Generic release struct parameterized by state marker.
// ABOUTME: Owns the trace and the resolved endpoint as the run moves between states.

use super::outcome::{ReleaseOutcome, ReleaseReport};
use super::policy::ReleasePolicy;
use super::state::{Deploying, StateMarker};
use super::trace::ReleaseTrace;
use crate::provider::DeploymentRecord;
use crate::types::{ServiceEndpoint, ServiceId};

/// A release in progress, parameterized by its current state.
///
/// Transitions consume `self` and record the state they enter, so the trace
/// always matches the path the run actually took.
#[derive(Debug)]
pub struct Release<S> {
    pub(crate) service: ServiceId,
    pub(crate) policy: ReleasePolicy,
    pub(crate) endpoint: Option<ServiceEndpoint>,
    pub(crate) trace: ReleaseTrace,
    pub(crate) state: S,
}

/// Result of a transition that may end the run.
#[derive(Debug)]
pub enum Step<T> {
    /// The run moves on to the next state.
    Continue(Release<T>),
    /// The run reached a terminal outcome.
    Done(ReleaseReport),
}

impl Release<Deploying> {
    /// Enter the release flow for a deployment that has already been triggered.
    ///
    /// A pinned `endpoint` skips the provider lookup.
    pub fn new(
        service: ServiceId,
        policy: ReleasePolicy,
        endpoint: Option<ServiceEndpoint>,
    ) -> Self {
        Self::with_trace(service, policy, endpoint, ReleaseTrace::default())
    }

    /// Like [`Release::new`], continuing a trace that already holds earlier events.
    pub(crate) fn with_trace(
        service: ServiceId,
        policy: ReleasePolicy,
        endpoint: Option<ServiceEndpoint>,
        mut trace: ReleaseTrace,
    ) -> Self {
        trace.state_entered(Deploying.state());
        Release {
            service,
            policy,
            endpoint,
            trace,
            state: Deploying,
        }
    }
}

impl<S> Release<S> {
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    pub fn policy(&self) -> &ReleasePolicy {
        &self.policy
    }

    pub fn endpoint(&self) -> Option<&ServiceEndpoint> {
        self.endpoint.as_ref()
    }

    pub fn trace(&self) -> &ReleaseTrace {
        &self.trace
    }

    /// Move to the next state, recording it in the trace.
    pub(crate) fn transition<T: StateMarker>(self, next: T) -> Release<T> {
        let mut trace = self.trace;
        trace.state_entered(next.state());
        Release {
            service: self.service,
            policy: self.policy,
            endpoint: self.endpoint,
            trace,
            state: next,
        }
    }

    /// End the run with a terminal outcome.
    pub(crate) fn conclude(
        self,
        outcome: ReleaseOutcome,
        rollback_target: Option<DeploymentRecord>,
    ) -> ReleaseReport {
        let mut trace = self.trace;
        trace.concluded(outcome);
        ReleaseReport {
            service: self.service,
            outcome,
            endpoint: self.endpoint,
            rollback_target,
            trace,
        }
    }
}
