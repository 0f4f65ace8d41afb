//! Record management CLI commands.

use std::collections::HashMap;

use clap::{Args, Subcommand};

use admissions_core::AppResult;
use admissions_core::config::AppConfig;
use admissions_core::error::AppError;
use admissions_core::types::{FieldId, RecordId};
use admissions_entity::field::DirectoryField;
use admissions_service::DirectoryContent;

use super::Desk;
use crate::output::{self, OutputFormat};

/// Arguments for record commands
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Record subcommand
    #[command(subcommand)]
    pub command: RecordCommand,
}

/// Record subcommands
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add a record to a directory
    Create {
        /// Directory ID
        directory: String,
        /// Field values as `field=value`; the field is matched by id or name
        #[arg(short, long = "value", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },
    /// Change values of an existing record
    Update {
        /// Directory ID
        directory: String,
        /// Record ID
        record: String,
        /// Field values as `field=value`
        #[arg(short, long = "value", value_parser = parse_assignment, required = true)]
        values: Vec<(String, String)>,
    },
}

/// Execute record commands
pub async fn execute(args: &RecordArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let desk = Desk::connect(config)?;

    match &args.command {
        RecordCommand::Create { directory, values } => {
            let directory_id = super::parse_directory_id(directory)?;
            let content = DirectoryContent::new(desk.api.clone(), desk.notifier.clone(), directory_id);
            content.load().await?;
            let fields = content.fields().await;

            let values = resolve_values(&fields, values)?;
            let record = content.create_record(&values).await?;

            if format == OutputFormat::Json {
                output::print_item(&record, format);
            } else {
                output::print_success("Record created");
                output::print_kv("ID", &record.id.to_string());
            }
        }
        RecordCommand::Update {
            directory,
            record,
            values,
        } => {
            let directory_id = super::parse_directory_id(directory)?;
            let record_id: RecordId = record
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid record id '{record}': {e}")))?;
            let content = DirectoryContent::new(desk.api.clone(), desk.notifier.clone(), directory_id);
            content.load().await?;
            let fields = content.fields().await;

            content.begin_edit().await;
            for (field_id, value) in resolve_values(&fields, values)? {
                content.set_cell(record_id, field_id, &value).await?;
            }
            content.save().await?;
        }
    }

    Ok(())
}

fn resolve_values(
    fields: &[DirectoryField],
    assignments: &[(String, String)],
) -> AppResult<HashMap<FieldId, String>> {
    assignments
        .iter()
        .map(|(key, value)| Ok((super::find_field(fields, key)?.id, value.clone())))
        .collect()
}

/// Split a `field=value` argument.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("formula=a=b").unwrap(),
            ("formula".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment(" score =").unwrap(),
            ("score".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_assignment_rejects_missing_parts() {
        assert!(parse_assignment("score").is_err());
        assert!(parse_assignment("=10").is_err());
    }
}
