// ABOUTME: Release verification and rollback using the type state pattern.
// ABOUTME: Exports state markers, the controller, outcomes, and target selection.

mod approval;
mod controller;
mod error;
mod machine;
mod outcome;
mod policy;
mod state;
mod target;
mod trace;
mod transitions;

pub use approval::{ApprovalError, ApprovalGate, AutoApprove, HookApproval};
pub use controller::ReleaseController;
pub use error::ReleaseError;
pub use machine::{Release, Step};
pub use outcome::{ReleaseOutcome, ReleaseReport};
pub use policy::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS, DEFAULT_SETTLE_DELAY,
    DEFAULT_STABILIZATION_DELAY, ReleasePolicy,
};
pub use state::{
    Deploying, HealthChecking, ReleaseState, ResolvingRollbackTarget, RollingBack, Settling,
    Stabilizing, StateMarker, Unhealthy, VerifyingRollback,
};
pub use target::{NoPriorDeployment, TargetPolicy, find_rollback_target};
pub use trace::{ApiCall, ReleaseTrace, TraceEvent};
