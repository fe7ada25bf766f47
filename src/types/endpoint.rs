// ABOUTME: Validated base URL of a running service.
// ABOUTME: Joins health check paths onto the base without double slashes.

use reqwest::Url;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("endpoint must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("endpoint URL has no host: {0}")]
    MissingHost(String),

    #[error("endpoint URL must not have a query or fragment: {0}")]
    QueryOrFragment(String),
}

/// Base URL of a deployed service, resolved once per release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint(Url);

impl ServiceEndpoint {
    pub fn parse(value: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(value.trim()).map_err(|e| EndpointError::Invalid {
            url: value.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none() {
            return Err(EndpointError::MissingHost(value.to_string()));
        }

        // Health paths are appended to the URL text.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(EndpointError::QueryOrFragment(value.to_string()));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Full URL for a health check path such as `/health`.
    pub fn health_url(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().trim_end_matches('/'))
    }
}

impl Serialize for ServiceEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
