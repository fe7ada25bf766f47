// ABOUTME: Terminal outcomes of a release run and the final report.
// ABOUTME: Every run ends in exactly one outcome; none is left indeterminate.

use serde::Serialize;
use std::fmt;

use super::trace::ReleaseTrace;
use crate::provider::DeploymentRecord;
use crate::types::{ServiceEndpoint, ServiceId};

/// Final, immutable result of one controller run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseOutcome {
    /// New deployment passed health checks.
    Healthy,
    /// New deployment failed, prior deployment restored and healthy.
    RollbackVerified,
    /// Restore was rejected or the restored deployment never became healthy.
    RollbackFailed,
    /// Nothing to roll back to.
    NoPriorDeployment,
    /// The provider rejected our credentials.
    AbortedAuthError,
}

impl ReleaseOutcome {
    /// Whether the pipeline may continue.
    ///
    /// A verified rollback counts: the service is serving, but the release
    /// itself did not ship.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReleaseOutcome::Healthy | ReleaseOutcome::RollbackVerified
        )
    }

    /// Whether an operator has to step in.
    pub fn requires_intervention(&self) -> bool {
        !self.is_success()
    }

    /// Serving, but on the previous deployment.
    pub fn is_degraded(&self) -> bool {
        *self == ReleaseOutcome::RollbackVerified
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseOutcome::Healthy => "healthy",
            ReleaseOutcome::RollbackVerified => "rollback_verified",
            ReleaseOutcome::RollbackFailed => "rollback_failed",
            ReleaseOutcome::NoPriorDeployment => "no_prior_deployment",
            ReleaseOutcome::AbortedAuthError => "aborted_auth_error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReleaseOutcome::Healthy => "new deployment is healthy",
            ReleaseOutcome::RollbackVerified => {
                "new deployment was unhealthy; previous deployment restored and healthy"
            }
            ReleaseOutcome::RollbackFailed => {
                "rollback failed; service may be down, manual intervention required"
            }
            ReleaseOutcome::NoPriorDeployment => {
                "new deployment is unhealthy and there is no prior deployment to restore"
            }
            ReleaseOutcome::AbortedAuthError => {
                "provider rejected credentials; release aborted"
            }
        }
    }
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a release run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
    pub service: ServiceId,
    pub outcome: ReleaseOutcome,
    /// Endpoint that was probed, if one was ever resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<ServiceEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_target: Option<DeploymentRecord>,
    pub trace: ReleaseTrace,
}
