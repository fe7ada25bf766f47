// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates rollguard.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ServiceId;

use super::{CONFIG_FILENAME, Config, EnvValue};

pub fn init_config(
    dir: &Path,
    service: Option<&str>,
    api_url: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(s) = service {
        config.service = ServiceId::parse(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(url) = api_url {
        config.provider.api_url = url.to_string();
    }

    let yaml = generate_template_yaml(&config);
    // Refuse to write something we could not read back.
    Config::from_yaml(&yaml)?;
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let api_key_var = match &config.provider.api_key {
        EnvValue::FromEnv { var, .. } => var.as_str(),
        EnvValue::Literal(_) => "ROLLGUARD_API_KEY",
    };

    format!(
        r#"service: {}
provider:
  api_url: {}
  api_key:
    env: {}
# Pin the service URL instead of asking the provider for it
# endpoint: https://my-app.example.com
health:
  path: {}
  max_attempts: {}
  interval: {}
  timeout: {}
stabilization_delay: {}
rollback:
  settle_delay: {}
  # second_live: provider keeps the previous deployment marked live
  # previous_superseded: provider marks replaced deployments superseded
  target: {}
# auto, or hook to run .rollguard/hooks/approve before releasing
approval: auto
"#,
        config.service,
        config.provider.api_url,
        api_key_var,
        config.health.path,
        config.health.max_attempts,
        humantime_serde::re::humantime::format_duration(config.health.interval),
        humantime_serde::re::humantime::format_duration(config.health.timeout),
        humantime_serde::re::humantime::format_duration(config.stabilization_delay),
        humantime_serde::re::humantime::format_duration(config.rollback.settle_delay),
        config.rollback.target,
    )
}
