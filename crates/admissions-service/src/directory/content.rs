//! Table view of a directory's records with in-place editing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use admissions_client::DirectoryApi;
use admissions_core::AppResult;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::{DirectoryId, FieldId, Notice, RecordId, ValueId};
use admissions_entity::directory::Directory;
use admissions_entity::field::validation::validate_default_value;
use admissions_entity::field::{DirectoryField, RawValue};
use admissions_entity::record::{DirectoryRecord, UpsertValuesRequest, ValueUpsert};

use super::record::build_record;

/// One cell of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column.
    pub field_id: FieldId,
    /// Stored value id, `None` when the record has no value yet.
    pub value_id: Option<ValueId>,
    /// Text shown in the cell.
    pub value: String,
}

/// One record rendered as a row with a cell per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    /// Record shown in the row.
    pub record_id: RecordId,
    /// Cells in field order.
    pub cells: Vec<Cell>,
}

impl ContentRow {
    /// Build the row of `record` for `fields`.
    pub fn from_record(record: &DirectoryRecord, fields: &[DirectoryField]) -> Self {
        let cells = fields
            .iter()
            .map(|field| match record.value_for(field.id) {
                Some(v) => Cell {
                    field_id: field.id,
                    value_id: v.id,
                    value: v.value.clone(),
                },
                None => Cell {
                    field_id: field.id,
                    value_id: None,
                    value: String::new(),
                },
            })
            .collect();
        Self {
            record_id: record.id,
            cells,
        }
    }

    /// The cell of a field.
    pub fn cell(&self, field_id: FieldId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.field_id == field_id)
    }
}

#[derive(Debug, Clone, Default)]
struct EditSession {
    rows: Vec<ContentRow>,
    new_row: HashMap<FieldId, String>,
}

#[derive(Debug, Default)]
struct ContentState {
    directory: Option<Directory>,
    fields: Vec<DirectoryField>,
    rows: Vec<ContentRow>,
    edit: Option<EditSession>,
    saving: bool,
}

/// Records of one directory, viewed and edited as a table.
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    /// Directory shown.
    directory_id: DirectoryId,
    /// Backend access.
    api: Arc<dyn DirectoryApi>,
    /// User-facing notices.
    notifier: Arc<dyn Notifier>,
    /// Table and edit state.
    state: Arc<Mutex<ContentState>>,
}

impl DirectoryContent {
    /// Creates an empty view of a directory.
    pub fn new(
        api: Arc<dyn DirectoryApi>,
        notifier: Arc<dyn Notifier>,
        directory_id: DirectoryId,
    ) -> Self {
        Self {
            directory_id,
            api,
            notifier,
            state: Arc::new(Mutex::new(ContentState::default())),
        }
    }

    /// Fetch the directory and rebuild the table.
    pub async fn load(&self) -> AppResult<Directory> {
        let directory = self
            .api
            .get_directory(self.directory_id)
            .await
            .inspect_err(|e| {
                warn!(directory_id = %self.directory_id, error = %e, "Failed to load directory");
                self.notifier.notify(Notice::error(format!(
                    "Failed to load directory: {}",
                    e.message
                )));
            })?;

        let fields = directory.ordered_fields();
        let rows = directory
            .records
            .iter()
            .map(|r| ContentRow::from_record(r, &fields))
            .collect();

        let mut state = self.state.lock().await;
        state.fields = fields;
        state.rows = rows;
        state.directory = Some(directory.clone());
        state.edit = None;
        Ok(directory)
    }

    /// Fields in column order.
    pub async fn fields(&self) -> Vec<DirectoryField> {
        self.state.lock().await.fields.clone()
    }

    /// Rows as shown: the edited copy while editing.
    pub async fn rows(&self) -> Vec<ContentRow> {
        let state = self.state.lock().await;
        match &state.edit {
            Some(edit) => edit.rows.clone(),
            None => state.rows.clone(),
        }
    }

    /// Whether edit mode is on.
    pub async fn is_editing(&self) -> bool {
        self.state.lock().await.edit.is_some()
    }

    /// Enter edit mode on a copy of the rows.
    pub async fn begin_edit(&self) {
        let mut state = self.state.lock().await;
        if state.edit.is_none() {
            state.edit = Some(EditSession {
                rows: state.rows.clone(),
                new_row: HashMap::new(),
            });
        }
    }

    /// Change one cell of an existing record.
    pub async fn set_cell(&self, record_id: RecordId, field_id: FieldId, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let edit = state
            .edit
            .as_mut()
            .ok_or_else(|| AppError::conflict("Not in edit mode"))?;
        let cell = edit
            .rows
            .iter_mut()
            .find(|r| r.record_id == record_id)
            .and_then(|r| r.cells.iter_mut().find(|c| c.field_id == field_id))
            .ok_or_else(|| AppError::not_found("Cell not found"))?;
        cell.value = value.to_string();
        Ok(())
    }

    /// Change one cell of the row being added.
    pub async fn set_new_row(&self, field_id: FieldId, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.fields.iter().any(|f| f.id == field_id) {
            return Err(AppError::not_found("Field not found"));
        }
        let edit = state
            .edit
            .as_mut()
            .ok_or_else(|| AppError::conflict("Not in edit mode"))?;
        edit.new_row.insert(field_id, value.to_string());
        Ok(())
    }

    /// Leave edit mode, discarding changes.
    pub async fn cancel(&self) {
        self.state.lock().await.edit = None;
    }

    /// Validate and persist the edit session.
    ///
    /// A non-empty new row is created first, then changed cells are
    /// upserted. On failure edit mode stays on with the changes intact.
    pub async fn save(&self) -> AppResult<()> {
        let (new_record, upserts) = {
            let mut state = self.state.lock().await;
            if state.saving {
                return Err(AppError::busy("Changes are already being saved"));
            }
            let Some(edit) = state.edit.as_ref() else {
                return Err(AppError::conflict("Not in edit mode"));
            };

            let prepared = prepare_save(&state.fields, &state.rows, edit)
                .inspect_err(|e| self.notifier.notify(Notice::error(e.message.clone())))?;
            if prepared.0.is_none() && prepared.1.is_empty() {
                state.edit = None;
                self.notifier.notify(Notice::info("No changes to save"));
                return Ok(());
            }
            state.saving = true;
            prepared
        };

        let result = self.persist(new_record, upserts).await;
        self.state.lock().await.saving = false;

        match result {
            Ok(()) => {
                info!(directory_id = %self.directory_id, "Directory values saved");
                self.load().await?;
                self.notifier.notify(Notice::success("Changes saved"));
                Ok(())
            }
            Err(e) => {
                warn!(directory_id = %self.directory_id, error = %e, "Failed to save values");
                self.notifier.notify(Notice::error(e.message.clone()));
                Err(e)
            }
        }
    }

    async fn persist(
        &self,
        new_record: Option<HashMap<FieldId, String>>,
        upserts: Vec<ValueUpsert>,
    ) -> AppResult<()> {
        if let Some(values) = new_record {
            self.create_record(&values).await?;
            // The record exists now; a retry after a failed upsert must not add it again.
            if let Some(edit) = self.state.lock().await.edit.as_mut() {
                edit.new_row.clear();
            }
        }
        if !upserts.is_empty() {
            debug!(directory_id = %self.directory_id, count = upserts.len(), "Upserting values");
            self.api
                .upsert_values(self.directory_id, &UpsertValuesRequest { values: upserts })
                .await?;
        }
        Ok(())
    }

    /// Create a record from raw values keyed by field.
    pub async fn create_record(&self, values: &HashMap<FieldId, String>) -> AppResult<DirectoryRecord> {
        let fields = self.fields().await;
        let request = build_record(&fields, values)?;
        let record = self.api.create_record(self.directory_id, &request).await?;
        info!(directory_id = %self.directory_id, record_id = %record.id, "Record created");
        Ok(record)
    }
}

type PreparedSave = (Option<HashMap<FieldId, String>>, Vec<ValueUpsert>);

fn prepare_save(
    fields: &[DirectoryField],
    saved: &[ContentRow],
    edit: &EditSession,
) -> AppResult<PreparedSave> {
    let by_id: HashMap<FieldId, &DirectoryField> = fields.iter().map(|f| (f.id, f)).collect();

    let mut upserts = Vec::new();
    for row in &edit.rows {
        let before = saved.iter().find(|r| r.record_id == row.record_id);
        for cell in &row.cells {
            let Some(field) = by_id.get(&cell.field_id) else {
                continue;
            };
            check_value(field, &cell.value)?;

            let unchanged = before
                .and_then(|r| r.cell(cell.field_id))
                .is_some_and(|c| c.value == cell.value);
            if unchanged {
                continue;
            }
            upserts.push(ValueUpsert {
                id: cell.value_id,
                field_id: cell.field_id,
                record_id: row.record_id,
                value: canonical(field, &cell.value)?,
            });
        }
    }

    let new_row = edit
        .new_row
        .values()
        .any(|v| !v.trim().is_empty())
        .then(|| edit.new_row.clone());
    if let Some(values) = &new_row {
        for (field_id, value) in values {
            if let Some(field) = by_id.get(field_id) {
                check_value(field, value)?;
            }
        }
        // Required fields are checked when the record is built.
        let _ = build_record(fields, values)?;
    }

    Ok((new_row, upserts))
}

fn check_value(field: &DirectoryField, value: &str) -> AppResult<()> {
    match validate_default_value(field.field_type, value) {
        Some(message) => Err(AppError::validation(format!(
            "{}: {message}",
            field.display_name
        ))),
        None => Ok(()),
    }
}

fn canonical(field: &DirectoryField, value: &str) -> AppResult<String> {
    let typed = RawValue::new(field.field_type, value).typed()?;
    Ok(typed.map(|v| v.to_raw()).unwrap_or_default())
}
