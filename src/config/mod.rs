// ABOUTME: Configuration types and parsing for rollguard.yml.
// ABOUTME: Handles YAML parsing, validation, and destination merging.

mod deserialize;
mod env_value;
mod health;
mod init;
mod provider;
mod rollback;

pub use env_value::EnvValue;
pub use health::HealthConfig;
pub use init::init_config;
pub use provider::ProviderConfig;
pub use rollback::RollbackConfig;

use deserialize::{
    deserialize_endpoint_option, deserialize_service_id, deserialize_service_id_option,
};

use crate::error::{Error, Result};
use crate::release::{DEFAULT_STABILIZATION_DELAY, ReleasePolicy};
use crate::types::{ServiceEndpoint, ServiceId};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "rollguard.yml";
pub const CONFIG_FILENAME_ALT: &str = "rollguard.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".rollguard/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_service_id")]
    pub service: ServiceId,

    pub provider: ProviderConfig,

    /// Pinned service URL; looked up from the provider when absent.
    #[serde(default, deserialize_with = "deserialize_endpoint_option")]
    pub endpoint: Option<ServiceEndpoint>,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default = "default_stabilization_delay", with = "humantime_serde")]
    pub stabilization_delay: Duration,

    #[serde(default)]
    pub rollback: RollbackConfig,

    #[serde(default)]
    pub approval: ApprovalMode,

    /// Abort the whole run after this long.
    #[serde(default, with = "humantime_serde")]
    pub release_timeout: Option<Duration>,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_service_id_option")]
    pub service: Option<ServiceId>,

    #[serde(default, deserialize_with = "deserialize_endpoint_option")]
    pub endpoint: Option<ServiceEndpoint>,

    #[serde(default)]
    pub health: Option<HealthConfig>,

    #[serde(default, with = "humantime_serde")]
    pub stabilization_delay: Option<Duration>,

    #[serde(default)]
    pub rollback: Option<RollbackConfig>,
}

/// Who approves a release before it starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// No gate; the pipeline already decided.
    #[default]
    Auto,
    /// Run `.rollguard/hooks/approve`.
    Hook,
}

fn default_stabilization_delay() -> Duration {
    DEFAULT_STABILIZATION_DELAY
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.health.path.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "health.path must start with '/': {}",
                self.health.path
            )));
        }

        if self.health.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "health.timeout must be greater than zero".to_string(),
            ));
        }

        let api_url = Url::parse(&self.provider.api_url).map_err(|e| {
            Error::InvalidConfig(format!(
                "provider.api_url is not a valid URL ({}): {}",
                e, self.provider.api_url
            ))
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "provider.api_url must use http or https: {}",
                self.provider.api_url
            )));
        }

        Ok(())
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref service) = dest.service {
            merged.service = service.clone();
        }

        if dest.endpoint.is_some() {
            merged.endpoint = dest.endpoint.clone();
        }

        if let Some(ref health) = dest.health {
            merged.health = health.clone();
        }

        if let Some(delay) = dest.stabilization_delay {
            merged.stabilization_delay = delay;
        }

        if let Some(ref rollback) = dest.rollback {
            merged.rollback = rollback.clone();
        }

        merged.validate()?;
        Ok(merged)
    }

    /// Timing and retry policy for the release controller.
    pub fn policy(&self) -> ReleasePolicy {
        ReleasePolicy {
            max_attempts: self.health.max_attempts,
            interval: self.health.interval,
            attempt_timeout: self.health.timeout,
            stabilization_delay: self.stabilization_delay,
            settle_delay: self.rollback.settle_delay,
            target_policy: self.rollback.target,
        }
    }

    pub fn template() -> Self {
        Config {
            service: ServiceId::new("srv-my-app".to_string()),
            provider: ProviderConfig::new("https://api.example.com/v1"),
            endpoint: None,
            health: HealthConfig::default(),
            stabilization_delay: default_stabilization_delay(),
            rollback: RollbackConfig::default(),
            approval: ApprovalMode::default(),
            release_timeout: None,
            destinations: HashMap::new(),
        }
    }
}
