// ABOUTME: Approval gate awaited before a release enters the state machine.
// ABOUTME: Auto-approval for unattended pipelines, or a project approve hook.

use async_trait::async_trait;
use thiserror::Error;

use crate::hooks::{HookContext, HookPoint, HookRunner};
use crate::types::ServiceId;

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("release denied: {0}")]
    Denied(String),

    #[error("approval unavailable: {0}")]
    Unavailable(String),
}

/// External collaborator that decides whether a release may proceed.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn await_approval(&self, service: &ServiceId) -> Result<(), ApprovalError>;
}

/// Approves every release.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn await_approval(&self, _service: &ServiceId) -> Result<(), ApprovalError> {
        Ok(())
    }
}

/// Runs the project's `approve` hook; exit status 0 approves.
#[derive(Debug)]
pub struct HookApproval {
    runner: HookRunner,
}

impl HookApproval {
    pub fn new(runner: HookRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ApprovalGate for HookApproval {
    async fn await_approval(&self, service: &ServiceId) -> Result<(), ApprovalError> {
        let context = HookContext::new(service.clone());

        let Some(result) = self.runner.run(HookPoint::Approve, &context).await else {
            return Err(ApprovalError::Unavailable(format!(
                "no {} hook found",
                HookPoint::Approve.filename()
            )));
        };

        if result.success {
            return Ok(());
        }

        let reason = match result.stderr.trim() {
            "" => match result.exit_code {
                Some(code) => format!("approve hook exited with code {code}"),
                None => "approve hook was terminated".to_string(),
            },
            stderr => stderr.to_string(),
        };
        Err(ApprovalError::Denied(reason))
    }
}
