// ABOUTME: Release state marker types for the type state pattern.
// ABOUTME: Rollback states carry the resolved target so it cannot be missing.

use serde::Serialize;
use std::fmt;

use crate::provider::DeploymentRecord;

/// Runtime name of a release state, recorded in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseState {
    Deploying,
    Stabilizing,
    HealthChecking,
    Unhealthy,
    ResolvingRollbackTarget,
    RollingBack,
    Settling,
    VerifyingRollback,
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseState::Deploying => "deploying",
            ReleaseState::Stabilizing => "stabilizing",
            ReleaseState::HealthChecking => "health_checking",
            ReleaseState::Unhealthy => "unhealthy",
            ReleaseState::ResolvingRollbackTarget => "resolving_rollback_target",
            ReleaseState::RollingBack => "rolling_back",
            ReleaseState::Settling => "settling",
            ReleaseState::VerifyingRollback => "verifying_rollback",
        };
        f.write_str(name)
    }
}

/// Implemented by every state marker.
pub trait StateMarker {
    fn state(&self) -> ReleaseState;
}

/// New deployment triggered, release flow entered.
/// Available actions: `begin()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Deploying;

/// Waiting for the new deployment to finish starting.
/// Available actions: `stabilize()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Stabilizing;

/// Probing the new deployment.
/// Available actions: `check_health()`
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthChecking;

/// Every probe attempt failed.
/// Available actions: `begin_rollback()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Unhealthy;

/// Looking up the deployment to restore.
/// Available actions: `resolve_target()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvingRollbackTarget;

/// Target resolved, restore not yet requested.
/// Available actions: `restore()`
#[derive(Debug, Clone)]
pub struct RollingBack {
    pub(crate) target: DeploymentRecord,
}

/// Restore accepted, waiting for it to take effect.
/// Available actions: `settle()`
#[derive(Debug, Clone)]
pub struct Settling {
    pub(crate) target: DeploymentRecord,
}

/// Probing the restored deployment.
/// Available actions: `verify()`
#[derive(Debug, Clone)]
pub struct VerifyingRollback {
    pub(crate) target: DeploymentRecord,
}

macro_rules! state_marker {
    ($($ty:ident),* $(,)?) => {
        $(
            impl StateMarker for $ty {
                fn state(&self) -> ReleaseState {
                    ReleaseState::$ty
                }
            }
        )*
    };
}

state_marker!(
    Deploying,
    Stabilizing,
    HealthChecking,
    Unhealthy,
    ResolvingRollbackTarget,
    RollingBack,
    Settling,
    VerifyingRollback,
);
