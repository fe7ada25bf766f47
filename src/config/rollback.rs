// ABOUTME: Rollback configuration.
// ABOUTME: Settle delay after a restore and the target selection policy.

use serde::Deserialize;
use std::time::Duration;

use crate::release::{DEFAULT_SETTLE_DELAY, TargetPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RollbackConfig {
    #[serde(default = "default_settle_delay", with = "humantime_serde")]
    pub settle_delay: Duration,

    #[serde(default)]
    pub target: TargetPolicy,
}

fn default_settle_delay() -> Duration {
    DEFAULT_SETTLE_DELAY
}

impl Default for RollbackConfig {
    fn default() -> Self {
        RollbackConfig {
            settle_delay: default_settle_delay(),
            target: TargetPolicy::default(),
        }
    }
}
