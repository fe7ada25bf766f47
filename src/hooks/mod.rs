// ABOUTME: Hooks system for release lifecycle events.
// ABOUTME: Discovers and executes shell scripts at approve, post-release, and on-failure points.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::release::ReleaseOutcome;
use crate::types::{DeploymentId, ServiceId};

/// Hook execution points in the release lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before the release starts. Failure denies the release.
    Approve,
    /// After a release ends in a successful outcome. Failure logs warning.
    PostRelease,
    /// After a release ends in an outcome that needs an operator. Failure logs warning.
    OnFailure,
}

impl HookPoint {
    /// Get the hook filename for this point.
    pub fn filename(&self) -> &'static str {
        match self {
            HookPoint::Approve => "approve",
            HookPoint::PostRelease => "post-release",
            HookPoint::OnFailure => "on-failure",
        }
    }

    /// The notification hook for a finished release.
    pub fn for_outcome(outcome: ReleaseOutcome) -> Self {
        if outcome.requires_intervention() {
            HookPoint::OnFailure
        } else {
            HookPoint::PostRelease
        }
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub service: ServiceId,
    /// Host running the release.
    pub runner: String,
    pub endpoint: Option<String>,
    pub outcome: Option<ReleaseOutcome>,
    pub rollback_target: Option<DeploymentId>,
}

impl HookContext {
    pub fn new(service: ServiceId) -> Self {
        Self {
            service,
            runner: gethostname::gethostname().to_string_lossy().into_owned(),
            endpoint: None,
            outcome: None,
            rollback_target: None,
        }
    }

    /// Convert context to environment variables.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("ROLLGUARD_SERVICE".to_string(), self.service.to_string());
        env.insert("ROLLGUARD_RUNNER".to_string(), self.runner.clone());
        if let Some(ref endpoint) = self.endpoint {
            env.insert("ROLLGUARD_ENDPOINT".to_string(), endpoint.clone());
        }
        if let Some(outcome) = self.outcome {
            env.insert("ROLLGUARD_OUTCOME".to_string(), outcome.to_string());
        }
        if let Some(ref target) = self.rollback_target {
            env.insert("ROLLGUARD_TARGET".to_string(), target.to_string());
        }
        env
    }
}

/// Result of running a hook.
#[derive(Debug)]
pub struct HookResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Discovers and runs hooks from a project directory.
#[derive(Debug, Clone)]
pub struct HookRunner {
    hooks_dir: PathBuf,
}

impl HookRunner {
    /// Create a new hook runner looking for hooks in the given project directory.
    pub fn new(project_dir: &Path) -> Self {
        Self {
            hooks_dir: project_dir.join(".rollguard").join("hooks"),
        }
    }

    /// Check if a hook exists for the given point.
    pub fn hook_exists(&self, point: HookPoint) -> bool {
        self.hook_path(point).is_file()
    }

    fn hook_path(&self, point: HookPoint) -> PathBuf {
        self.hooks_dir.join(point.filename())
    }

    /// Run a hook if it exists.
    ///
    /// Returns None if the hook doesn't exist, or Some(HookResult) if it was run.
    pub async fn run(&self, point: HookPoint, context: &HookContext) -> Option<HookResult> {
        let hook_path = self.hook_path(point);

        if !hook_path.is_file() {
            return None;
        }

        tracing::info!("Running {} hook: {}", point.filename(), hook_path.display());

        let output = Command::new(&hook_path)
            .envs(context.to_env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) => {
                let result = HookResult {
                    success: output.status.success(),
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                let stdout = result.stdout.trim();
                if !stdout.is_empty() {
                    tracing::debug!(hook = point.filename(), %stdout, "hook output");
                }

                if result.success {
                    tracing::info!("{} hook completed successfully", point.filename());
                } else {
                    tracing::warn!(
                        "{} hook failed with exit code {:?}",
                        point.filename(),
                        result.exit_code
                    );
                }

                Some(result)
            }
            Err(e) => {
                tracing::error!("Failed to execute {} hook: {}", point.filename(), e);
                Some(HookResult {
                    success: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: e.to_string(),
                })
            }
        }
    }
}
