// ABOUTME: Errors raised before a release enters the state machine.
// ABOUTME: Once the machine runs, every failure is a ReleaseOutcome instead.

use super::approval::ApprovalError;
use super::trace::ReleaseTrace;
use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// The approval gate refused or could not be consulted.
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// The provider did not accept the deploy trigger. `trace` holds the failed call.
    #[error("failed to trigger deploy: {source}")]
    Trigger {
        source: ProviderError,
        trace: ReleaseTrace,
    },
}

impl ReleaseError {
    /// Events recorded before the failure, if any.
    pub fn trace(&self) -> Option<&ReleaseTrace> {
        match self {
            ReleaseError::Trigger { trace, .. } => Some(trace),
            ReleaseError::Approval(_) => None,
        }
    }
}
