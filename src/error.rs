// ABOUTME: Application-wide error types for rollguard.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::release::{ReleaseError, ReleaseOutcome};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to build health probe: {0}")]
    Probe(#[source] reqwest::Error),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error("release aborted: {0}")]
    Aborted(String),

    #[error("release timed out after {0:?}")]
    Timeout(Duration),

    #[error("release ended with {outcome}: {}", .outcome.description())]
    ReleaseFailed { outcome: ReleaseOutcome },

    #[error("release was rolled back to the previous deployment")]
    RolledBack,
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::RolledBack => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
