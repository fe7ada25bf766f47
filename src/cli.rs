// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use humantime_serde::re::humantime::parse_duration;
use rollguard::output::OutputMode;
use rollguard::release::ReleasePolicy;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rollguard")]
#[command(about = "Post-deploy health verification with automatic rollback")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new rollguard.yml configuration file
    Init {
        /// Provider service id
        #[arg(long)]
        service: Option<String>,

        /// Provider management API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Overwrite an existing rollguard.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Verify a fresh deployment and roll back if it is unhealthy
    Release(ReleaseArgs),

    /// Show deployment history and the rollback target
    History {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}

#[derive(Args)]
pub struct ReleaseArgs {
    /// Target destination (defined in config)
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Ask the provider to start the deploy before verifying it
    #[arg(long)]
    pub trigger: bool,

    /// Health check path, overriding health.path (e.g. /ready)
    #[arg(long, value_name = "PATH", value_parser = parse_health_path)]
    pub health_path: Option<String>,

    /// Health check attempts per verification pass
    #[arg(long)]
    pub max_attempts: Option<NonZeroU32>,

    /// Delay between health check attempts (e.g. 10s)
    #[arg(long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Per-attempt health check timeout
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Wait before the first health check
    #[arg(long, value_parser = parse_duration)]
    pub stabilization_delay: Option<Duration>,

    /// Wait after a restore before re-verifying
    #[arg(long, value_parser = parse_duration)]
    pub settle_delay: Option<Duration>,

    /// Exit with code 2 when the release was rolled back
    #[arg(long)]
    pub fail_on_rollback: bool,

    /// Write the release trace as JSON lines to this file
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,
}

fn parse_health_path(value: &str) -> Result<String, String> {
    if value.starts_with('/') {
        Ok(value.to_string())
    } else {
        Err(format!("must start with '/': {value}"))
    }
}

impl ReleaseArgs {
    /// Apply command-line overrides on top of the configured policy.
    pub fn apply_to(&self, policy: &mut ReleasePolicy) {
        if let Some(n) = self.max_attempts {
            policy.max_attempts = n;
        }
        if let Some(d) = self.interval {
            policy.interval = d;
        }
        if let Some(d) = self.timeout {
            policy.attempt_timeout = d;
        }
        if let Some(d) = self.stabilization_delay {
            policy.stabilization_delay = d;
        }
        if let Some(d) = self.settle_delay {
            policy.settle_delay = d;
        }
    }
}
