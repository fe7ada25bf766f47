// ABOUTME: Release command implementation.
// ABOUTME: Handles approval, the release state machine, hooks, and the trace file.

use super::provider_connection::connect_provider;
use crate::cli::ReleaseArgs;
use rollguard::clock::TokioSleeper;
use rollguard::config::{ApprovalMode, Config};
use rollguard::diagnostics::{Diagnostics, Warning};
use rollguard::error::{Error, Result};
use rollguard::health::HttpProbe;
use rollguard::hooks::{HookContext, HookPoint, HookRunner};
use rollguard::output::Output;
use rollguard::release::{
    ApprovalGate, AutoApprove, HookApproval, ReleaseController, ReleaseOutcome, ReleaseReport,
    ReleaseTrace,
};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Verify the latest deployment and roll back if it is unhealthy.
pub async fn release(
    config: Config,
    args: ReleaseArgs,
    project_dir: &Path,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let mut policy = config.policy();
    args.apply_to(&mut policy);

    let hook_runner = HookRunner::new(project_dir);
    if config.approval == ApprovalMode::Hook && !hook_runner.hook_exists(HookPoint::Approve) {
        return Err(Error::InvalidConfig(format!(
            "approval: hook requires .rollguard/hooks/{}",
            HookPoint::Approve.filename()
        )));
    }

    let health_path = args.health_path.as_deref().unwrap_or(&config.health.path);
    let provider = connect_provider(&config.provider)?;
    let probe = HttpProbe::new(health_path).map_err(Error::Probe)?;
    let mut controller = ReleaseController::new(provider, probe, TokioSleeper, policy);
    if let Some(ref endpoint) = config.endpoint {
        controller = controller.with_endpoint(endpoint.clone());
    }

    let gate: Box<dyn ApprovalGate> = match config.approval {
        ApprovalMode::Auto => Box::new(AutoApprove),
        ApprovalMode::Hook => Box::new(HookApproval::new(hook_runner.clone())),
    };

    output.progress(&format!(
        "Releasing {} ({} health checks on {}, {} apart)",
        config.service,
        controller.policy().max_attempts,
        health_path,
        humantime_serde::re::humantime::format_duration(controller.policy().interval)
    ));

    let run = async {
        if args.trigger {
            output.progress("  → Triggering deploy...");
            controller
                .trigger_and_release(&config.service, gate.as_ref(), controller.provider())
                .await
        } else {
            controller.release(&config.service, gate.as_ref()).await
        }
    };
    let report = match supervise(run, config.release_timeout).await? {
        Ok(report) => report,
        Err(e) => {
            if let (Some(path), Some(trace)) = (&args.trace, e.trace()) {
                save_trace(path, trace, &mut diag);
                emit_warnings(&output, &diag);
            }
            return Err(e.into());
        }
    };

    if let Some(ref path) = args.trace {
        save_trace(path, &report.trace, &mut diag);
    }

    run_outcome_hook(&hook_runner, &report, &mut diag).await;

    if report.outcome.is_degraded() {
        let restored = report
            .rollback_target
            .as_ref()
            .map(|t| t.id.to_string())
            .unwrap_or_default();
        diag.warn(Warning::rolled_back(format!(
            "{} was rolled back to {}",
            config.service, restored
        )));
    }

    emit_warnings(&output, &diag);
    output.report(&report);

    match report.outcome {
        ReleaseOutcome::Healthy => Ok(()),
        ReleaseOutcome::RollbackVerified if args.fail_on_rollback => Err(Error::RolledBack),
        ReleaseOutcome::RollbackVerified => Ok(()),
        outcome => Err(Error::ReleaseFailed { outcome }),
    }
}

fn emit_warnings(output: &Output, diag: &Diagnostics) {
    for warning in diag.warnings() {
        output.warning(warning);
    }
}

/// Run the release, aborting on Ctrl-C or when the overall timeout expires.
async fn supervise<F: Future>(run: F, timeout: Option<Duration>) -> Result<F::Output> {
    let bounded = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| Error::Timeout(limit)),
            None => Ok(run.await),
        }
    };

    tokio::select! {
        result = bounded => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; abandoning release");
            Err(Error::Aborted("interrupted".to_string()))
        }
    }
}

fn save_trace(path: &Path, trace: &ReleaseTrace, diag: &mut Diagnostics) {
    if let Err(e) = write_trace(path, trace) {
        diag.warn(Warning::trace_write(format!(
            "failed to write trace to {}: {}",
            path.display(),
            e
        )));
    }
}

fn write_trace(path: &Path, trace: &ReleaseTrace) -> Result<()> {
    let lines = trace.to_json_lines()?;
    std::fs::write(path, lines)?;
    Ok(())
}

async fn run_outcome_hook(runner: &HookRunner, report: &ReleaseReport, diag: &mut Diagnostics) {
    let point = HookPoint::for_outcome(report.outcome);
    let mut context = HookContext::new(report.service.clone());
    context.endpoint = report.endpoint.as_ref().map(|e| e.to_string());
    context.outcome = Some(report.outcome);
    context.rollback_target = report.rollback_target.as_ref().map(|t| t.id.clone());

    if let Some(result) = runner.run(point, &context).await
        && !result.success
    {
        let reason = match result.stderr.trim() {
            "" => match result.exit_code {
                Some(code) => format!("exit code {code}"),
                None => "terminated".to_string(),
            },
            stderr => stderr.to_string(),
        };
        diag.warn(Warning::hook_failed(format!(
            "{} hook failed: {}",
            point.filename(),
            reason
        )));
    }
}
