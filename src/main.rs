// ABOUTME: Entry point for the rollguard CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use rollguard::config::{self, CONFIG_FILENAME, Config};
use rollguard::error::Result;
use rollguard::output::Output;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = cli.output_mode();
    let result = run(cli, Output::new(mode)).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init {
            service,
            api_url,
            force,
        } => {
            config::init_config(&cwd, service.as_deref(), api_url.as_deref(), force)?;
            output.success(&format!("Created {CONFIG_FILENAME}"));
            Ok(())
        }
        Commands::Release(args) => {
            let config = load_config(&cwd, args.destination.as_deref())?;
            commands::release(config, args, &cwd, output).await
        }
        Commands::History { destination } => {
            let config = load_config(&cwd, destination.as_deref())?;
            commands::history(config, output).await
        }
    }
}

/// Discover the config and apply destination overrides if specified.
fn load_config(dir: &Path, destination: Option<&str>) -> Result<Config> {
    let config = Config::discover(dir)?;
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}
