//! Field management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use admissions_core::AppResult;
use admissions_core::config::AppConfig;
use admissions_core::error::AppError;
use admissions_entity::field::{DirectoryField, FieldType};
use admissions_service::reorder::{DropOutcome, ReorderEvent};
use admissions_service::field::FieldFormError;
use admissions_service::{FieldEditor, FieldService};

use super::Desk;
use crate::output::{self, OutputFormat};

/// Arguments for field commands
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Field subcommand
    #[command(subcommand)]
    pub command: FieldCommand,
}

/// Field subcommands
#[derive(Debug, Subcommand)]
pub enum FieldCommand {
    /// List the fields of a directory in display order
    List {
        /// Directory ID
        directory: String,
    },
    /// Add a field to a directory
    Create {
        /// Directory ID
        directory: String,
        /// System name
        #[arg(short, long)]
        name: String,
        /// Display name
        #[arg(short, long)]
        display_name: String,
        /// Value type: STRING, NUMBER, DATE, DATETIME or BOOLEAN
        #[arg(short = 't', long = "type", default_value = "STRING")]
        field_type: String,
        /// Every record must carry a value
        #[arg(long)]
        required: bool,
        /// Values must be unique (implies required)
        #[arg(long)]
        unique: bool,
        /// Default value
        #[arg(long)]
        default: Option<String>,
    },
    /// Change attributes of a field
    Update {
        /// Directory ID
        directory: String,
        /// Field ID or system name
        field: String,
        /// New system name
        #[arg(short, long)]
        name: Option<String>,
        /// New display name
        #[arg(short, long)]
        display_name: Option<String>,
        /// New value type
        #[arg(short = 't', long = "type")]
        field_type: Option<String>,
        /// Required flag
        #[arg(long)]
        required: Option<bool>,
        /// Unique flag
        #[arg(long)]
        unique: Option<bool>,
        /// New default value
        #[arg(long, conflicts_with = "clear_default")]
        default: Option<String>,
        /// Remove the default value
        #[arg(long)]
        clear_default: bool,
    },
    /// Delete a field
    Delete {
        /// Directory ID
        directory: String,
        /// Field ID or system name
        field: String,
    },
    /// Show usage statistics and the resulting edit lock
    Stats {
        /// Directory ID
        directory: String,
        /// Field ID or system name
        field: String,
    },
    /// Move a field to another position
    Move {
        /// Directory ID
        directory: String,
        /// Current 0-based position
        from: usize,
        /// Target 0-based position
        to: usize,
    },
}

/// Field display row
#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    /// Position
    order: i64,
    /// Field ID
    id: String,
    /// System name
    name: String,
    /// Display name
    display_name: String,
    /// Attributes
    attributes: String,
    /// Default value
    default: String,
    /// System flag
    system: String,
}

impl From<&DirectoryField> for FieldRow {
    fn from(f: &DirectoryField) -> Self {
        Self {
            order: f.sort_order,
            id: f.id.to_string(),
            name: f.name.clone(),
            display_name: f.display_name.clone(),
            attributes: f.attribute_summary(),
            default: f.default_value.clone().unwrap_or_default(),
            system: if f.is_system { "✓" } else { "" }.to_string(),
        }
    }
}

/// Execute field commands
pub async fn execute(args: &FieldArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let desk = Desk::connect(config)?;
    let directory = match &args.command {
        FieldCommand::List { directory }
        | FieldCommand::Create { directory, .. }
        | FieldCommand::Update { directory, .. }
        | FieldCommand::Delete { directory, .. }
        | FieldCommand::Stats { directory, .. }
        | FieldCommand::Move { directory, .. } => super::parse_directory_id(directory)?,
    };
    let service = FieldService::new(
        desk.api.clone(),
        desk.notifier.clone(),
        directory,
        config.reorder.debounce(),
    );
    let fields = service.refetch().await;
    let mut editor = FieldEditor::new();

    match &args.command {
        FieldCommand::List { .. } => print_fields(&fields, format),
        FieldCommand::Create {
            name,
            display_name,
            field_type,
            required,
            unique,
            default,
            ..
        } => {
            editor.set_type(field_type.parse()?)?;
            editor.set_name(name);
            editor.set_display_name(display_name);
            if *unique {
                editor.set_unique(true)?;
            } else if *required {
                editor.set_required(true)?;
            }
            if let Some(default) = default {
                editor.set_default_value(default);
            }
            let field = service.create(&mut editor).await?;
            output::print_kv("ID", &field.id.to_string());
        }
        FieldCommand::Update {
            field,
            name,
            display_name,
            field_type,
            required,
            unique,
            default,
            clear_default,
            ..
        } => {
            let target = super::find_field(&fields, field)?;
            service.select_field(&mut editor, &target).await;

            if let Some(field_type) = field_type {
                editor.set_type(field_type.parse::<FieldType>()?)?;
            }
            if let Some(name) = name {
                editor.set_name(name);
            }
            if let Some(display_name) = display_name {
                editor.set_display_name(display_name);
            }
            if let Some(unique) = unique {
                editor.set_unique(*unique)?;
            }
            if let Some(required) = required {
                editor.set_required(*required)?;
            }
            if *clear_default {
                editor.set_has_default(false);
            } else if let Some(default) = default {
                editor.set_default_value(default);
            }
            match service.update(&mut editor).await {
                Ok(_) => {}
                Err(e) if e.message == FieldFormError::NoChanges.to_string() => {}
                Err(e) => return Err(e),
            }
        }
        FieldCommand::Delete { field, .. } => {
            let target = super::find_field(&fields, field)?;
            service.delete(&mut editor, &target).await?;
        }
        FieldCommand::Stats { field, .. } => {
            let target = super::find_field(&fields, field)?;
            let stats = service.stats(target.id).await?;
            let lock = service.select_field(&mut editor, &target).await;

            if format == OutputFormat::Json {
                output::print_item(&stats, format);
                return Ok(());
            }
            output::print_kv("Field", &target.display_name);
            output::print_kv("Stored values", &stats.field_values_count.to_string());
            output::print_kv("Related records", &stats.has_related_records.to_string());
            output::print_kv("Default value", &stats.has_default_value.to_string());
            output::print_kv(
                "Type",
                lock.field_type.map_or("editable", |r| r.message()),
            );
            output::print_kv("Unique", lock.unique.map_or("editable", |r| r.message()));
        }
        FieldCommand::Move { from, to, .. } => {
            let reorder = service.reorder();
            let mut events = reorder.subscribe();
            match reorder.on_drop(*from, *to).await? {
                DropOutcome::Unchanged => output::print_info("Field is already at that position"),
                DropOutcome::Scheduled(token) => loop {
                    let event = events
                        .recv()
                        .await
                        .map_err(|e| AppError::internal(format!("Reorder events closed: {e}")))?;
                    match event {
                        ReorderEvent::Committed { token: t, fields } if t == token => {
                            print_fields(&fields, format);
                            break;
                        }
                        ReorderEvent::RolledBack { token: t, message, .. } if t == token => {
                            return Err(AppError::validation(message));
                        }
                        _ => {}
                    }
                },
            }
            reorder.shutdown().await;
        }
    }

    Ok(())
}

fn print_fields(fields: &[DirectoryField], format: OutputFormat) {
    let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
    output::print_list(&rows, format);
}
