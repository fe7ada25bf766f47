// ABOUTME: Ordered log of everything a release run did.
// ABOUTME: State entries, waits, probe attempts, and provider API call results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::outcome::ReleaseOutcome;
use super::state::ReleaseState;
use crate::health::HealthCheckResult;

/// Provider API calls made by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiCall {
    TriggerDeploy,
    GetServiceEndpoint,
    ListDeployments,
    RestoreDeployment,
}

/// One entry of the release trace.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    StateEntered {
        state: ReleaseState,
        at: DateTime<Utc>,
    },
    Waited {
        state: ReleaseState,
        #[serde(with = "humantime_serde")]
        duration: Duration,
        at: DateTime<Utc>,
    },
    Probe {
        state: ReleaseState,
        #[serde(flatten)]
        result: HealthCheckResult,
    },
    ApiCall {
        call: ApiCall,
        ok: bool,
        detail: String,
        at: DateTime<Utc>,
    },
    Concluded {
        outcome: ReleaseOutcome,
        at: DateTime<Utc>,
    },
}

/// Append-only event log for one release run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReleaseTrace {
    events: Vec<TraceEvent>,
}

impl ReleaseTrace {
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub(crate) fn state_entered(&mut self, state: ReleaseState) {
        tracing::info!(%state, "release state entered");
        self.events.push(TraceEvent::StateEntered {
            state,
            at: Utc::now(),
        });
    }

    pub(crate) fn waited(&mut self, state: ReleaseState, duration: Duration) {
        self.events.push(TraceEvent::Waited {
            state,
            duration,
            at: Utc::now(),
        });
    }

    pub(crate) fn probe(&mut self, state: ReleaseState, result: HealthCheckResult) {
        if result.success {
            tracing::info!(
                attempt = result.attempt,
                detail = %result.detail,
                "health check passed"
            );
        } else {
            tracing::debug!(
                attempt = result.attempt,
                detail = %result.detail,
                "health check failed"
            );
        }
        self.events.push(TraceEvent::Probe { state, result });
    }

    pub(crate) fn api_call(&mut self, call: ApiCall, ok: bool, detail: impl Into<String>) {
        let detail = detail.into();
        if ok {
            tracing::info!(?call, %detail, "provider call succeeded");
        } else {
            tracing::warn!(?call, %detail, "provider call failed");
        }
        self.events.push(TraceEvent::ApiCall {
            call,
            ok,
            detail,
            at: Utc::now(),
        });
    }

    pub(crate) fn concluded(&mut self, outcome: ReleaseOutcome) {
        tracing::info!(%outcome, "release concluded");
        self.events.push(TraceEvent::Concluded {
            outcome,
            at: Utc::now(),
        });
    }

    /// States in the order they were entered.
    pub fn states(&self) -> Vec<ReleaseState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::StateEntered { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    /// Probe results in order, across both verification passes.
    pub fn probes(&self) -> impl Iterator<Item = (ReleaseState, &HealthCheckResult)> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Probe { state, result } => Some((*state, result)),
            _ => None,
        })
    }

    pub fn probe_count(&self) -> usize {
        self.probes().count()
    }

    /// Number of calls of the given kind, successful or not.
    pub fn api_call_count(&self, kind: ApiCall) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::ApiCall { call, .. } if *call == kind))
            .count()
    }

    /// Serialize as newline-delimited JSON, one event per line.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_order() {
        let mut trace = ReleaseTrace::default();
        trace.state_entered(ReleaseState::Deploying);
        trace.state_entered(ReleaseState::Stabilizing);
        trace.waited(ReleaseState::Stabilizing, Duration::from_secs(60));
        trace.state_entered(ReleaseState::HealthChecking);
        trace.probe(
            ReleaseState::HealthChecking,
            HealthCheckResult::failed(1, None, "refused"),
        );
        trace.concluded(ReleaseOutcome::Healthy);

        assert_eq!(
            trace.states(),
            vec![
                ReleaseState::Deploying,
                ReleaseState::Stabilizing,
                ReleaseState::HealthChecking
            ]
        );
        assert_eq!(trace.probe_count(), 1);
        assert_eq!(trace.events().len(), 6);
    }

    #[test]
    fn counts_api_calls_by_kind() {
        let mut trace = ReleaseTrace::default();
        trace.api_call(ApiCall::ListDeployments, true, "3 deployments");
        trace.api_call(ApiCall::RestoreDeployment, false, "HTTP 409");
        trace.api_call(ApiCall::RestoreDeployment, true, "accepted");

        assert_eq!(trace.api_call_count(ApiCall::RestoreDeployment), 2);
        assert_eq!(trace.api_call_count(ApiCall::GetServiceEndpoint), 0);
    }

    #[test]
    fn trigger_call_serializes_by_name() {
        let mut trace = ReleaseTrace::default();
        trace.api_call(ApiCall::TriggerDeploy, false, "HTTP 422: no build");

        let line = trace.to_json_lines().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();

        assert_eq!(parsed["event"], "api_call");
        assert_eq!(parsed["call"], "trigger_deploy");
        assert_eq!(parsed["ok"], false);
        assert_eq!(trace.api_call_count(ApiCall::TriggerDeploy), 1);
    }

    #[test]
    fn json_lines_are_tagged() {
        let mut trace = ReleaseTrace::default();
        trace.state_entered(ReleaseState::Settling);
        trace.waited(ReleaseState::Settling, Duration::from_secs(60));
        trace.probe(
            ReleaseState::VerifyingRollback,
            HealthCheckResult::passed(1, Duration::from_millis(12), "HTTP 200 OK"),
        );

        let lines = trace.to_json_lines().unwrap();
        let parsed: Vec<serde_json::Value> = lines
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["event"], "state_entered");
        assert_eq!(parsed[0]["state"], "settling");
        assert_eq!(parsed[1]["event"], "waited");
        assert_eq!(parsed[1]["duration"], "1m");
        assert!(parsed[1]["at"].is_string());
        assert_eq!(parsed[2]["event"], "probe");
        assert_eq!(parsed[2]["state"], "verifying_rollback");
        assert_eq!(parsed[2]["attempt"], 1);
    }
}
