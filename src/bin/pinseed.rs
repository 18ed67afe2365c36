//! pinseed CLI Binary
//!
//! Command-line interface for seeding and pinning content-addressed directories.

use clap::Parser;
use pinseed::cli::{Cli, RunContext};
use pinseed::config::{default_repo_root, ConfigLoader};
use pinseed::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("pinseed starting");

    let context = match RunContext::new(cli.repo.clone(), cli.config.clone()) {
        Ok(ctx) => {
            info!(repo = %ctx.repo_root().display(), "Repository opened");
            ctx
        }
        Err(e) => {
            error!("Error opening repository: {}", e);
            eprintln!("{}", pinseed::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", pinseed::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let repo = cli.repo.clone().unwrap_or_else(default_repo_root);
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(&repo),
    };
    let mut config = loaded.ok().map(|c| c.logging).unwrap_or_default();

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
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    } else if config.output == "file" && config.file.is_none() {
        config.file = Some(repo.join("pinseed.log"));
    }

    config
}
