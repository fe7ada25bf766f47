// ABOUTME: Config values that may come from the environment.
// ABOUTME: Keeps secrets such as provider API keys out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// A literal string, or a reference to an environment variable.
///
/// ```yaml
/// api_key: { env: PROVIDER_API_KEY }
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn from_env(var: impl Into<String>) -> Self {
        EnvValue::FromEnv {
            var: var.into(),
            default: None,
        }
    }

    /// Resolve to a non-empty string.
    pub fn resolve(&self) -> Result<String> {
        let value = match self {
            EnvValue::Literal(s) => s.clone(),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) if !val.is_empty() => val,
                _ => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone()))?,
            },
        };

        if value.is_empty() {
            return Err(Error::InvalidConfig("secret value is empty".to_string()));
        }
        Ok(value)
    }
}

// Literal values are usually secrets, so never print them.
impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("Literal(<redacted>)"),
            EnvValue::FromEnv { var, .. } => f.debug_struct("FromEnv").field("var", var).finish(),
        }
    }
}
