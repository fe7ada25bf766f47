// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::diagnostics::{Warning, WarningKind};
use crate::provider::DeploymentRecord;
use crate::release::{ReleaseOutcome, ReleaseReport};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration_secs(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => self.emit_stdout("success", message),
        }
    }

    /// Print a warning. Shown in every mode; JSON lines carry its kind.
    pub fn warning(&self, warning: &Warning) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Warning: {}", warning.message);
            }
            OutputMode::Json => {
                let event = WarningEvent {
                    event: "warning",
                    kind: warning.kind,
                    message: &warning.message,
                    duration_secs: self.duration_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_stderr("error", message),
        }
    }

    /// Print the result of a release run.
    pub fn report(&self, report: &ReleaseReport) {
        match self.mode {
            OutputMode::Normal => {
                let marker = match report.outcome {
                    ReleaseOutcome::Healthy => "✓",
                    ReleaseOutcome::RollbackVerified => "↺",
                    _ => "✗",
                };
                println!(
                    "{marker} {}: {} ({:.1}s)",
                    report.service,
                    report.outcome.description(),
                    self.elapsed_secs()
                );
                if let Some(ref endpoint) = report.endpoint {
                    println!("  endpoint: {endpoint}");
                }
                if let Some(ref target) = report.rollback_target {
                    println!("  restored: {}", describe_deployment(target));
                }
                println!("  health checks: {}", report.trace.probe_count());
            }
            OutputMode::Quiet => {
                println!("{}", report.outcome);
            }
            OutputMode::Json => {
                let event = ReportEvent {
                    event: "release",
                    report,
                    probes: report.trace.probe_count(),
                    duration_secs: self.duration_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a service's deployment history and its would-be rollback target.
    pub fn history(&self, deployments: &[DeploymentRecord], target: Option<&DeploymentRecord>) {
        match self.mode {
            OutputMode::Normal => {
                if deployments.is_empty() {
                    println!("No deployments");
                }
                for deployment in deployments {
                    let marker = if target.is_some_and(|t| t.id == deployment.id) {
                        "→"
                    } else {
                        " "
                    };
                    println!("{marker} {}", describe_deployment(deployment));
                }
                match target {
                    Some(t) => println!("Rollback target: {}", t.id),
                    None => println!("Rollback target: none"),
                }
            }
            OutputMode::Quiet => {
                if let Some(t) = target {
                    println!("{}", t.id);
                }
            }
            OutputMode::Json => {
                let event = HistoryEvent {
                    event: "history",
                    deployments,
                    rollback_target: target,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    fn emit_stdout(&self, event: &str, message: &str) {
        if let Some(json) = self.json_event(event, message) {
            println!("{json}");
        }
    }

    fn emit_stderr(&self, event: &str, message: &str) {
        if let Some(json) = self.json_event(event, message) {
            eprintln!("{json}");
        }
    }

    fn json_event(&self, event: &str, message: &str) -> Option<String> {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration_secs(),
        };
        serde_json::to_string(&event).ok()
    }
}

fn describe_deployment(deployment: &DeploymentRecord) -> String {
    let commit = deployment.short_commit();
    let commit = if commit.is_empty() { "-" } else { commit };
    format!(
        "{} {} {} {}",
        deployment.id,
        deployment.status,
        commit,
        deployment.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct WarningEvent<'a> {
    event: &'a str,
    kind: WarningKind,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct ReportEvent<'a> {
    event: &'a str,
    #[serde(flatten)]
    report: &'a ReleaseReport,
    probes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct HistoryEvent<'a> {
    event: &'a str,
    deployments: &'a [DeploymentRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    rollback_target: Option<&'a DeploymentRecord>,
}
