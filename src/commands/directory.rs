//! Directory management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use admissions_core::AppResult;
use admissions_core::config::AppConfig;
use admissions_entity::directory::{CreateDirectory, Directory};
use admissions_service::{DirectoryCatalog, DirectoryContent};

use super::Desk;
use crate::output::{self, OutputFormat};

/// Arguments for directory commands
#[derive(Debug, Args)]
pub struct DirectoryArgs {
    /// Directory subcommand
    #[command(subcommand)]
    pub command: DirectoryCommand,
}

/// Directory subcommands
#[derive(Debug, Subcommand)]
pub enum DirectoryCommand {
    /// List directories of an admission year
    List {
        /// Admission year (defaults to `catalog.default_year`)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show a directory with its records
    Show {
        /// Directory ID
        id: String,
    },
    /// Create a directory
    Create {
        /// System name
        #[arg(short, long)]
        name: String,
        /// Display name
        #[arg(short, long)]
        display_name: String,
        /// Admission year
        #[arg(short, long)]
        year: i32,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a directory with its fields and records
    Delete {
        /// Directory ID
        id: String,
    },
}

/// Directory display row
#[derive(Debug, Serialize, Tabled)]
struct DirectoryRow {
    /// Directory ID
    id: String,
    /// System name
    name: String,
    /// Display name
    display_name: String,
    /// Admission year
    year: i32,
    /// Number of fields
    fields: usize,
    /// Number of records
    records: usize,
    /// System flag
    system: String,
}

impl From<&Directory> for DirectoryRow {
    fn from(d: &Directory) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            display_name: d.display_name.clone(),
            year: d.year,
            fields: d.fields.len(),
            records: d.records.len(),
            system: if d.is_system { "✓" } else { "" }.to_string(),
        }
    }
}

/// Execute directory commands
pub async fn execute(
    args: &DirectoryArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let desk = Desk::connect(config)?;
    let catalog = DirectoryCatalog::new(desk.api.clone(), desk.notifier.clone());

    match &args.command {
        DirectoryCommand::List { year } => {
            let year = year.or(config.catalog.default_year);
            let directories = catalog.load(year).await;
            let rows: Vec<DirectoryRow> = directories.iter().map(DirectoryRow::from).collect();
            output::print_list(&rows, format);
        }
        DirectoryCommand::Show { id } => {
            let directory_id = super::parse_directory_id(id)?;
            let content = DirectoryContent::new(desk.api.clone(), desk.notifier.clone(), directory_id);
            let directory = content.load().await?;

            if format == OutputFormat::Json {
                output::print_item(&directory, format);
                return Ok(());
            }

            output::print_kv("Directory", &directory.display_name);
            output::print_kv("Name", &directory.name);
            output::print_kv("Year", &directory.year.to_string());
            if let Some(description) = &directory.description {
                output::print_kv("Description", description);
            }
            println!();

            let fields = content.fields().await;
            let header: Vec<String> = fields.iter().map(|f| f.display_name.clone()).collect();
            let mut builder = tabled::builder::Builder::default();
            builder.push_record(header);
            for row in content.rows().await {
                builder.push_record(row.cells.iter().map(|c| c.value.clone()));
            }
            if directory.records.is_empty() {
                println!("No records.");
            } else {
                println!("{}", builder.build());
            }
        }
        DirectoryCommand::Create {
            name,
            display_name,
            year,
            description,
        } => {
            let mut draft = CreateDirectory::new(name.as_str(), display_name.as_str(), *year);
            draft.description = description.clone();
            let directory = catalog.create(draft).await?;
            output::print_kv("ID", &directory.id.to_string());
        }
        DirectoryCommand::Delete { id } => {
            let directory_id = super::parse_directory_id(id)?;
            catalog.load(None).await;
            catalog.delete(directory_id).await?;
        }
    }

    Ok(())
}
