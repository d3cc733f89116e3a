// src/main.rs
//
// Entry point: parse arguments, load config, set up logging, run one command.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gestion_academica::cli::{self, Cli};
use gestion_academica::config::AppConfig;
use gestion_academica::AppState;

/// `--log-level` wins, then `RUST_LOG`, then the config file
fn init_logging(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config_level)),
    }
    .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli.to_config_overrides());

    init_logging(cli.log_level.as_deref(), &config.logging.level);
    log::debug!("Loaded configuration: {:?}", config.database);

    let state = match AppState::initialize(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to open the database: {}", e);
            process::exit(1);
        }
    };

    match cli::run(&state, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", serde_json::to_string_pretty(&error)?);
            process::exit(error.error_type.exit_code());
        }
    }
}
