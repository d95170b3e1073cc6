//! Launchpad CLI Binary
//!
//! Interactive pipeline launcher and scripting entry point.

use anyhow::Context;
use clap::Parser;
use launchpad::cli::{load_config, map_error, Cli, Commands, RunContext};
use launchpad::error::ApiError;
use launchpad::logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Launchpad starting");

    match run(&cli) {
        Ok(output) => {
            info!("Command completed successfully");
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            let message = match e.downcast_ref::<ApiError>() {
                Some(api_error) => map_error(api_error),
                None => format!("{:#}", e),
            };
            eprintln!("{}", message);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut context = RunContext::new(cli).context("Failed to start the launcher")?;
    info!(
        title = %context.navigator().title(context.session()),
        projects_root = %context.session().projects_root(),
        "Launcher initialised"
    );
    let command = cli.command.clone().unwrap_or(Commands::Shell);
    let output = context.execute(&command)?;
    Ok(output)
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let workspace = cli
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let mut config = load_config(cli, &workspace)
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
