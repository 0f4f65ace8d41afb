//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use admissions_core::AppResult;
use admissions_core::config::AppConfig;
use admissions_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(&redacted(config), format);
        }
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Backend", &config.backend.base_url);
            output::print_kv(
                "Timeout",
                &format!("{}s", config.backend.request_timeout_seconds),
            );
            output::print_kv(
                "Session",
                if config.backend.session_cookie.is_some() {
                    "configured"
                } else {
                    "none"
                },
            );
            output::print_kv("Reorder debounce", &format!("{}ms", config.reorder.debounce_ms));
            output::print_kv(
                "Default year",
                &config
                    .catalog
                    .default_year
                    .map_or_else(|| "all".to_string(), |y| y.to_string()),
            );
        }
        ConfigCommand::Generate { output: out_path } => {
            let default_config = include_str!("../../config/default.toml");

            if let Some(parent) = std::path::Path::new(out_path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::internal(format!("Failed to create dir: {e}")))?;
            }
            std::fs::write(out_path, default_config)
                .map_err(|e| AppError::internal(format!("Failed to write config: {e}")))?;

            output::print_success(&format!("Default config written to '{out_path}'"));
        }
    }

    Ok(())
}

/// Copy of the configuration with the session cookie masked.
fn redacted(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    if shown.backend.session_cookie.is_some() {
        shown.backend.session_cookie = Some("********".to_string());
    }
    shown
}
