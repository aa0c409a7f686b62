//! Wrapview CLI Binary
//!
//! Command-line interface for the wrap preview configurator.

use anyhow::Context;
use clap::Parser;
use std::process;
use tracing::{error, info};
use wrapview::cli::{map_error, Cli, RunContext};
use wrapview::config::ConfigLoader;
use wrapview::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Wrapview CLI starting");

    if let Err(e) = run(cli) {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<wrapview::error::ApiError>() {
            Some(api_error) => eprintln!("{}", map_error(api_error)),
            None => eprintln!("{:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Session work is cooperative and single-threaded.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let context = RunContext::new(cli.workspace.clone(), cli.config.clone(), cli.demo)?;
    let output = runtime.block_on(context.execute(&cli.command))?;
    info!("Command completed successfully");
    println!("{}", output);
    Ok(())
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
    };

    if cli.quiet {
        config.enabled = false;
    }
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

    config
}
