// ABOUTME: Rollback target selection over an ordered deployment history.
// ABOUTME: Pure functions of the history, so resolution is deterministic and idempotent.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::provider::{DeploymentRecord, DeploymentStatus};

/// How to pick the deployment to restore from a most-recent-first history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    /// The provider keeps the evaluated deployment and its predecessor both
    /// marked `live` until a rollback happens. The target is the second
    /// `live` entry.
    #[default]
    SecondLive,

    /// The provider demotes a deployment to `superseded` as soon as a newer
    /// one replaces it. The first entry is the one under evaluation; the
    /// target is the most recent `superseded` entry after it.
    PreviousSuperseded,
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPolicy::SecondLive => f.write_str("second_live"),
            TargetPolicy::PreviousSuperseded => f.write_str("previous_superseded"),
        }
    }
}

/// History holds no deployment that can be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no prior deployment to roll back to ({policy} policy, {history_len} in history)")]
pub struct NoPriorDeployment {
    pub policy: TargetPolicy,
    pub history_len: usize,
}

/// Pick the rollback target from `history` (most recent first).
pub fn find_rollback_target(
    history: &[DeploymentRecord],
    policy: TargetPolicy,
) -> Result<DeploymentRecord, NoPriorDeployment> {
    let target = match policy {
        TargetPolicy::SecondLive => history.iter().filter(|d| d.is_live()).nth(1),
        TargetPolicy::PreviousSuperseded => history
            .iter()
            .skip(1)
            .find(|d| d.status == DeploymentStatus::Superseded),
    };

    target.cloned().ok_or(NoPriorDeployment {
        policy,
        history_len: history.len(),
    })
}
