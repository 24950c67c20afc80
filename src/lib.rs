mod cli;
mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod phase;
pub mod projector;
pub mod status;
pub mod store;
pub mod templates;

#[cfg(test)]
mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use crate::config::AppConfig;
use tracing::error;

pub fn run() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = cli::Cli::parse();

  let mut config = match AppConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      return ExitCode::FAILURE;
    }
  };
  cli.apply_overrides(&mut config);

  let log_filter = if cli.verbose { "debug" } else { config.log_filter.as_str() };
  logging::init(log_filter);

  let runtime = match tokio::runtime::Runtime::new() {
    Ok(runtime) => runtime,
    Err(e) => {
      error!("Failed to start async runtime: {}", e);
      return ExitCode::FAILURE;
    }
  };

  match runtime.block_on(cli::execute(cli, config)) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{}", e);
      ExitCode::FAILURE
    }
  }
}
