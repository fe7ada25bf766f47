// ABOUTME: Deployment records as reported by the hosting provider.
// ABOUTME: Read-only view; the controller never mutates provider state directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::DeploymentId;

/// Provider-side lifecycle status of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// Serving traffic (or still marked as such by the provider).
    Live,
    /// Build or rollout in progress.
    Building,
    /// Build or rollout failed.
    Failed,
    /// Replaced by a newer live deployment.
    Superseded,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Live => "live",
            DeploymentStatus::Building => "building",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Superseded => "superseded",
            DeploymentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a service's deployment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: DeploymentId,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub commit_ref: String,
    pub created_at: DateTime<Utc>,
}

impl DeploymentRecord {
    pub fn is_live(&self) -> bool {
        self.status == DeploymentStatus::Live
    }

    /// Short commit reference for display (first 8 characters).
    pub fn short_commit(&self) -> &str {
        match self.commit_ref.char_indices().nth(8) {
            Some((idx, _)) => &self.commit_ref[..idx],
            None => &self.commit_ref,
        }
    }
}
