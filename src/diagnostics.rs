// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release.
// ABOUTME: Collects warnings that shouldn't fail a release but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during a release.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected during a release.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A post-release or on-failure hook exited non-zero.
    pub fn hook_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HookFailed,
            message: message.into(),
        }
    }

    /// The trace file could not be written.
    pub fn trace_write(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::TraceWrite,
            message: message.into(),
        }
    }

    /// The release did not ship but the previous deployment is serving.
    pub fn rolled_back(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RolledBack,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    HookFailed,
    TraceWrite,
    RolledBack,
}
