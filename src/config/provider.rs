// ABOUTME: Hosting provider API configuration.
// ABOUTME: Base URL, credentials, and per-request timeout for the management API.

use serde::Deserialize;
use std::time::Duration;

use super::EnvValue;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    pub api_url: String,

    #[serde(default = "default_api_key")]
    pub api_key: EnvValue,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_api_key() -> EnvValue {
    EnvValue::from_env("ROLLGUARD_API_KEY")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ProviderConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        ProviderConfig {
            api_url: api_url.into(),
            api_key: default_api_key(),
            request_timeout: default_request_timeout(),
        }
    }
}
