//! Admissions Desk: directory and field administration from the terminal.
//!
//! Main entry point that parses the command line, loads configuration,
//! and dispatches to the service layer.

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use admissions_core::config::AppConfig;

use crate::commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!("Starting admissions-desk v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(kind = ?e.kind, "Command failed");
        if !output::already_reported(&e.message) {
            output::print_error(&e.message);
        }
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Logs go to stderr so table and JSON output stay clean.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
