// ABOUTME: Timing and retry knobs for one release run.
// ABOUTME: Fixed-interval retries; every wait is explicit so tests can zero it.

use std::num::NonZeroU32;
use std::time::Duration;

use super::target::TargetPolicy;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_STABILIZATION_DELAY: Duration = Duration::from_secs(60);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePolicy {
    /// Probe attempts per verification pass.
    pub max_attempts: NonZeroU32,
    /// Delay between consecutive attempts. Not applied after the last one.
    pub interval: Duration,
    /// Hard timeout for a single probe.
    pub attempt_timeout: Duration,
    /// Wait after the deploy before the first probe.
    pub stabilization_delay: Duration,
    /// Wait after an accepted restore before re-probing.
    pub settle_delay: Duration,
    pub target_policy: TargetPolicy,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN),
            interval: DEFAULT_INTERVAL,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            stabilization_delay: DEFAULT_STABILIZATION_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
            target_policy: TargetPolicy::default(),
        }
    }
}
