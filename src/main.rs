// ABOUTME: Entry point for the webbundle CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;
use webbundle::config::{self, Config};
use webbundle::error::Result;
use webbundle::output::{Output, OutputMode};

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

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli.command, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match command {
        Commands::Init { bundle, force } => {
            config::init_config(&cwd, bundle.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy { destination, force } => {
            let config = load_config(&cwd, destination.as_deref())?;
            let output = output.with_bundle(&config.bundle);
            commands::deploy(config, force, output).await
        }
        Commands::Uninstall { destination, force } => {
            let config = load_config(&cwd, destination.as_deref())?;
            let output = output.with_bundle(&config.bundle);
            commands::uninstall(config, force, output).await
        }
        Commands::Status { destination } => {
            let config = load_config(&cwd, destination.as_deref())?;
            let output = output.with_bundle(&config.bundle);
            commands::status(config, output).await
        }
    }
}

/// Discover the config and apply destination overrides if specified.
fn load_config(cwd: &std::path::Path, destination: Option<&str>) -> Result<Config> {
    let config = Config::discover(cwd)?;
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}
