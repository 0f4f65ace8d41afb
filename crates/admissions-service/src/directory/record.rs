//! Building new records from user input.

use std::collections::HashMap;

use thiserror::Error;

use admissions_core::AppError;
use admissions_core::types::FieldId;
use admissions_entity::field::{CoercionError, DirectoryField, RawValue};
use admissions_entity::record::{CreateRecordRequest, NewRecordValue};

/// Input that cannot become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field has neither a value nor a default.
    #[error("Field '{0}' is required")]
    MissingRequired(String),
    /// A value does not fit its field's type.
    #[error("Field '{field}': {source}")]
    InvalidValue {
        /// Display name of the field.
        field: String,
        /// What went wrong.
        source: CoercionError,
    },
    /// A value names a field the directory does not have.
    #[error("Unknown field {0}")]
    UnknownField(FieldId),
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Turn raw input into a create request.
///
/// Each value passes through the typed boundary and is sent in canonical
/// form. Blank values fall back to the field's default; a required field
/// left without either is an error.
pub fn build_record(
    fields: &[DirectoryField],
    values: &HashMap<FieldId, String>,
) -> Result<CreateRecordRequest, RecordError> {
    if let Some(unknown) = values.keys().find(|id| !fields.iter().any(|f| f.id == **id)) {
        return Err(RecordError::UnknownField(*unknown));
    }

    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let entered = values
            .get(&field.id)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty());
        let raw = entered.or_else(|| field.default_value.as_deref());

        let typed = match raw {
            Some(raw) => RawValue::new(field.field_type, raw)
                .typed()
                .map_err(|source| RecordError::InvalidValue {
                    field: field.display_name.clone(),
                    source,
                })?,
            None => None,
        };

        match typed {
            Some(value) => out.push(NewRecordValue {
                field_id: field.id,
                value: value.to_raw(),
            }),
            None if field.is_required => {
                return Err(RecordError::MissingRequired(field.display_name.clone()));
            }
            None => {}
        }
    }

    Ok(CreateRecordRequest { values: out })
}
