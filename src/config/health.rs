// ABOUTME: HTTP health check configuration.
// ABOUTME: Fixed-interval retry parameters with sensible defaults.

use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::release::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: NonZeroU32,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_path() -> String {
    "/health".to_string()
}

fn default_max_attempts() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN)
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

fn default_timeout() -> Duration {
    DEFAULT_ATTEMPT_TIMEOUT
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            path: default_path(),
            max_attempts: default_max_attempts(),
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}
