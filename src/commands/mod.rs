//! CLI command definitions and dispatch.

pub mod config;
pub mod directory;
pub mod field;
pub mod record;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use admissions_client::{DirectoryApi, HttpDirectoryApi};
use admissions_core::AppResult;
use admissions_core::config::AppConfig;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::DirectoryId;
use admissions_entity::field::DirectoryField;

use crate::output::{ConsoleNotifier, OutputFormat};

/// Admissions Desk: directory and field administration
#[derive(Debug, Parser)]
#[command(name = "admissions-desk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>.toml`
    #[arg(short, long, env = "ADMISSIONS_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Directory management
    Directory(directory::DirectoryArgs),
    /// Field management
    Field(field::FieldArgs),
    /// Record management
    Record(record::RecordArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Load the configuration named on the command line.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        AppConfig::load(&self.config, self.env.as_deref())
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Directory(args) => directory::execute(args, &config, self.format).await,
            Commands::Field(args) => field::execute(args, &config, self.format).await,
            Commands::Record(args) => record::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Backend client and notifier shared by the commands.
#[derive(Debug, Clone)]
pub struct Desk {
    /// Backend access.
    pub api: Arc<dyn DirectoryApi>,
    /// Terminal notices.
    pub notifier: Arc<dyn Notifier>,
}

impl Desk {
    /// Connect to the configured backend.
    pub fn connect(config: &AppConfig) -> AppResult<Self> {
        let api = HttpDirectoryApi::new(&config.backend)?;
        tracing::debug!(base_url = api.base_url(), "Backend client ready");
        Ok(Self {
            api: Arc::new(api),
            notifier: Arc::new(ConsoleNotifier),
        })
    }
}

/// Helper: resolve a field by id or system name within a list.
pub fn find_field(fields: &[DirectoryField], key: &str) -> AppResult<DirectoryField> {
    fields
        .iter()
        .find(|f| f.id.to_string() == key || f.name == key)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Field '{key}' not found")))
}

/// Helper: parse a directory id argument.
pub fn parse_directory_id(raw: &str) -> AppResult<DirectoryId> {
    raw.parse()
        .map_err(|e| AppError::validation(format!("Invalid directory id '{raw}': {e}")))
}
