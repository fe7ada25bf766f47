// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var secrets, discovery, and destination merging.

use rollguard::config::*;
use rollguard::error::Error;
use rollguard::release::TargetPolicy;
use std::fs;
use std::time::Duration;

const MINIMAL: &str = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.service.as_str(), "srv-123");
        assert_eq!(config.provider.api_url, "https://api.example.com/v1");
        assert_eq!(config.provider.api_key, EnvValue::from_env("ROLLGUARD_API_KEY"));
        assert_eq!(config.provider.request_timeout, Duration::from_secs(30));
        assert!(config.endpoint.is_none());
        assert_eq!(config.health, HealthConfig::default());
        assert_eq!(config.health.path, "/health");
        assert_eq!(config.health.max_attempts.get(), 10);
        assert_eq!(config.stabilization_delay, Duration::from_secs(60));
        assert_eq!(config.rollback.settle_delay, Duration::from_secs(60));
        assert_eq!(config.rollback.target, TargetPolicy::SecondLive);
        assert_eq!(config.approval, ApprovalMode::Auto);
        assert!(config.release_timeout.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
  api_key:
    env: PROVIDER_API_KEY
  request_timeout: 10s
endpoint: https://app.example.com
health:
  path: /healthz
  max_attempts: 3
  interval: 2s
  timeout: 500ms
stabilization_delay: 1m
rollback:
  settle_delay: 30s
  target: previous_superseded
approval: hook
release_timeout: 30m
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(
            config.provider.api_key,
            EnvValue::from_env("PROVIDER_API_KEY")
        );
        assert_eq!(config.provider.request_timeout, Duration::from_secs(10));
        assert_eq!(
            config.endpoint.as_ref().map(|e| e.to_string()),
            Some("https://app.example.com".to_string())
        );
        assert_eq!(config.health.path, "/healthz");
        assert_eq!(config.health.max_attempts.get(), 3);
        assert_eq!(config.health.interval, Duration::from_secs(2));
        assert_eq!(config.health.timeout, Duration::from_millis(500));
        assert_eq!(config.stabilization_delay, Duration::from_secs(60));
        assert_eq!(config.rollback.settle_delay, Duration::from_secs(30));
        assert_eq!(config.rollback.target, TargetPolicy::PreviousSuperseded);
        assert_eq!(config.approval, ApprovalMode::Hook);
        assert_eq!(config.release_timeout, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn policy_reflects_config() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
health:
  max_attempts: 4
  interval: 3s
  timeout: 1s
stabilization_delay: 0s
rollback:
  settle_delay: 15s
"#;
        let policy = Config::from_yaml(yaml).unwrap().policy();

        assert_eq!(policy.max_attempts.get(), 4);
        assert_eq!(policy.interval, Duration::from_secs(3));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(1));
        assert_eq!(policy.stabilization_delay, Duration::ZERO);
        assert_eq!(policy.settle_delay, Duration::from_secs(15));
    }

    #[test]
    fn missing_service_returns_error() {
        let yaml = r#"
provider:
  api_url: https://api.example.com/v1
"#;
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn invalid_service_id_returns_error() {
        let yaml = r#"
service: "srv 123"
provider:
  api_url: https://api.example.com/v1
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn zero_max_attempts_returns_error() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
health:
  max_attempts: 0
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn unknown_target_policy_returns_error() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
rollback:
  target: newest
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn endpoint_must_be_http() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
endpoint: ftp://app.example.com
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn endpoint_with_query_is_rejected() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
endpoint: https://app.example.com/?preview=1
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("query or fragment"));
    }
}

mod validation {
    use super::*;

    #[test]
    fn health_path_must_be_absolute() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
health:
  path: health
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("health.path")));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
health:
  timeout: 0s
"#;
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn api_url_must_parse() {
        let yaml = r#"
service: srv-123
provider:
  api_url: not a url
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("api_url")));
    }

    #[test]
    fn api_url_must_be_http() {
        let yaml = r#"
service: srv-123
provider:
  api_url: file:///tmp/api
"#;
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(Error::InvalidConfig(_))
        ));
    }
}

mod env_vars {
    use super::*;

    #[test]
    fn literal_api_key() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
  api_key: rnd_literal
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.provider.api_key,
            EnvValue::Literal("rnd_literal".to_string())
        );
        assert_eq!(config.provider.api_key.resolve().unwrap(), "rnd_literal");
    }

    #[test]
    fn env_api_key_with_default() {
        let yaml = r#"
service: srv-123
provider:
  api_url: https://api.example.com/v1
  api_key:
    env: ROLLGUARD_CONFIG_TEST_KEY
    default: fallback-key
"#;
        let config = Config::from_yaml(yaml).unwrap();

        temp_env::with_var_unset("ROLLGUARD_CONFIG_TEST_KEY", || {
            assert_eq!(config.provider.api_key.resolve().unwrap(), "fallback-key");
        });

        temp_env::with_var("ROLLGUARD_CONFIG_TEST_KEY", Some("from_environment"), || {
            assert_eq!(
                config.provider.api_key.resolve().unwrap(),
                "from_environment"
            );
        });
    }

    #[test]
    fn missing_env_api_key_errors() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        temp_env::with_var_unset("ROLLGUARD_API_KEY", || {
            let err = config.provider.api_key.resolve().unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(ref v) if v == "ROLLGUARD_API_KEY"));
        });
    }
}

mod destinations {
    use super::*;

    const WITH_DESTINATIONS: &str = r#"
service: srv-prod
provider:
  api_url: https://api.example.com/v1
health:
  max_attempts: 10
destinations:
  staging:
    service: srv-staging
    endpoint: https://staging.example.com
    health:
      max_attempts: 2
    stabilization_delay: 5s
  canary:
    rollback:
      settle_delay: 5s
      target: previous_superseded
"#;

    #[test]
    fn destination_overrides_service_and_health() {
        let config = Config::from_yaml(WITH_DESTINATIONS).unwrap();
        let staging = config.for_destination("staging").unwrap();

        assert_eq!(staging.service.as_str(), "srv-staging");
        assert_eq!(
            staging.endpoint.map(|e| e.to_string()),
            Some("https://staging.example.com".to_string())
        );
        assert_eq!(staging.health.max_attempts.get(), 2);
        assert_eq!(staging.stabilization_delay, Duration::from_secs(5));
        assert_eq!(staging.provider, config.provider);
    }

    #[test]
    fn destination_keeps_unset_fields() {
        let config = Config::from_yaml(WITH_DESTINATIONS).unwrap();
        let canary = config.for_destination("canary").unwrap();

        assert_eq!(canary.service.as_str(), "srv-prod");
        assert_eq!(canary.health.max_attempts.get(), 10);
        assert_eq!(canary.rollback.settle_delay, Duration::from_secs(5));
        assert_eq!(canary.rollback.target, TargetPolicy::PreviousSuperseded);
    }

    #[test]
    fn unknown_destination_returns_error() {
        let config = Config::from_yaml(WITH_DESTINATIONS).unwrap();
        let err = config.for_destination("prod-eu").unwrap_err();
        assert!(matches!(err, Error::UnknownDestination(ref d) if d == "prod-eu"));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_rollguard_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), MINIMAL).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.service.as_str(), "srv-123");
    }

    #[test]
    fn finds_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".rollguard")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), MINIMAL).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

mod init {
    use super::*;

    #[test]
    fn generated_template_parses() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("srv-777"), Some("https://api.host.dev/v1"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.service.as_str(), "srv-777");
        assert_eq!(config.provider.api_url, "https://api.host.dev/v1");
        assert_eq!(config.health, HealthConfig::default());
        assert_eq!(config.approval, ApprovalMode::Auto);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, None, false).unwrap();

        let err = init_config(dir.path(), None, None, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert!(init_config(dir.path(), None, None, true).is_ok());
    }

    #[test]
    fn rejects_invalid_service_id() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init_config(dir.path(), Some("bad id!"), None, false).is_err());
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }
}
