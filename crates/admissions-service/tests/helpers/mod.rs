//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use admissions_client::DirectoryApi;
use admissions_core::AppResult;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::{DirectoryId, FieldId, RecordId, ValueId};
use admissions_entity::directory::{CreateDirectory, Directory, sort_fields};
use admissions_entity::field::{
    CreateFieldDto, DirectoryField, FieldStats, FieldType, ReorderFieldsRequest, UpdateFieldDto,
};
use admissions_entity::record::{
    CreateRecordRequest, DirectoryRecord, DirectoryValue, UpsertValuesRequest,
};
use admissions_service::{FieldService, MemoryNotifier};

/// Debounce used by the fixtures.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct FakeState {
    directories: Vec<Directory>,
    calls: Vec<&'static str>,
    reorder_requests: Vec<ReorderFieldsRequest>,
    update_requests: Vec<UpdateFieldDto>,
    upsert_requests: Vec<UpsertValuesRequest>,
    failures: HashMap<&'static str, AppError>,
    stats: HashMap<FieldId, FieldStats>,
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct FakeDirectoryApi {
    state: Mutex<FakeState>,
    reorder_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeDirectoryApi {
    /// A backend holding the given directories.
    pub fn with_directories(directories: Vec<Directory>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().directories = directories;
        api
    }

    /// Make the next call of `operation` fail with `err`.
    pub fn fail_next(&self, operation: &'static str, err: AppError) {
        self.state.lock().unwrap().failures.insert(operation, err);
    }

    /// Hold reorder responses until the returned handle is notified.
    pub fn hold_reorders(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.reorder_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Set the statistics reported for a field.
    pub fn set_stats(&self, field_id: FieldId, stats: FieldStats) {
        self.state.lock().unwrap().stats.insert(field_id, stats);
    }

    /// How many times `operation` was called.
    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    /// Every reorder body received.
    pub fn reorder_requests(&self) -> Vec<ReorderFieldsRequest> {
        self.state.lock().unwrap().reorder_requests.clone()
    }

    /// Every update body received.
    pub fn update_requests(&self) -> Vec<UpdateFieldDto> {
        self.state.lock().unwrap().update_requests.clone()
    }

    /// Every upsert body received.
    pub fn upsert_requests(&self) -> Vec<UpsertValuesRequest> {
        self.state.lock().unwrap().upsert_requests.clone()
    }

    /// Stored copy of a directory.
    pub fn directory(&self, directory_id: DirectoryId) -> Directory {
        self.state
            .lock()
            .unwrap()
            .directories
            .iter()
            .find(|d| d.id == directory_id)
            .cloned()
            .unwrap()
    }

    fn record(&self, operation: &'static str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        match state.failures.remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn with_directory<T>(
        &self,
        directory_id: DirectoryId,
        f: impl FnOnce(&mut Directory) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut state = self.state.lock().unwrap();
        let directory = state
            .directories
            .iter_mut()
            .find(|d| d.id == directory_id)
            .ok_or_else(|| AppError::from_status(404, "Directory not found"))?;
        f(directory)
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectoryApi {
    async fn list_directories(&self, year: Option<i32>) -> AppResult<Vec<Directory>> {
        self.record("list_directories")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .directories
            .iter()
            .filter(|d| year.is_none_or(|y| d.year == y))
            .cloned()
            .collect())
    }

    async fn create_directory(&self, request: &CreateDirectory) -> AppResult<Directory> {
        self.record("create_directory")?;
        let directory = Directory {
            id: DirectoryId::new(),
            name: request.name.clone(),
            display_name: request.display_name.clone(),
            description: request.description.clone(),
            is_system: request.is_system,
            is_active: request.is_active,
            year: request.year,
            created_at: None,
            updated_at: None,
            fields: Vec::new(),
            records: Vec::new(),
        };
        self.state.lock().unwrap().directories.push(directory.clone());
        Ok(directory)
    }

    async fn get_directory(&self, directory_id: DirectoryId) -> AppResult<Directory> {
        self.record("get_directory")?;
        self.with_directory(directory_id, |d| Ok(d.clone()))
    }

    async fn delete_directory(&self, directory_id: DirectoryId) -> AppResult<()> {
        self.record("delete_directory")?;
        self.state
            .lock()
            .unwrap()
            .directories
            .retain(|d| d.id != directory_id);
        Ok(())
    }

    async fn create_field(
        &self,
        directory_id: DirectoryId,
        request: &CreateFieldDto,
    ) -> AppResult<DirectoryField> {
        self.record("create_field")?;
        self.with_directory(directory_id, |d| {
            let field = DirectoryField {
                id: FieldId::new(),
                directory_id,
                name: request.name.clone(),
                display_name: request.display_name.clone(),
                field_type: request.field_type,
                is_system: request.is_system,
                is_required: request.is_required,
                is_unique: request.is_unique,
                default_value: request.default_value.clone(),
                sort_order: d.fields.len() as i64,
            };
            d.fields.push(field.clone());
            Ok(field)
        })
    }

    async fn update_field(
        &self,
        directory_id: DirectoryId,
        field_id: FieldId,
        request: &UpdateFieldDto,
    ) -> AppResult<DirectoryField> {
        self.record("update_field")?;
        self.state
            .lock()
            .unwrap()
            .update_requests
            .push(request.clone());
        self.with_directory(directory_id, |d| {
            let field = d
                .fields
                .iter_mut()
                .find(|f| f.id == field_id)
                .ok_or_else(|| AppError::from_status(404, "Field not found"))?;
            if let Some(name) = &request.name {
                field.name = name.clone();
            }
            if let Some(display_name) = &request.display_name {
                field.display_name = display_name.clone();
            }
            if let Some(field_type) = request.field_type {
                field.field_type = field_type;
            }
            if let Some(is_required) = request.is_required {
                field.is_required = is_required;
            }
            if let Some(is_unique) = request.is_unique {
                field.is_unique = is_unique;
            }
            if let Some(default_value) = &request.default_value {
                field.default_value = default_value.clone();
            }
            Ok(field.clone())
        })
    }

    async fn delete_field(&self, directory_id: DirectoryId, field_id: FieldId) -> AppResult<()> {
        self.record("delete_field")?;
        self.with_directory(directory_id, |d| {
            d.fields.retain(|f| f.id != field_id);
            Ok(())
        })
    }

    async fn reorder_fields(
        &self,
        directory_id: DirectoryId,
        request: &ReorderFieldsRequest,
    ) -> AppResult<Vec<DirectoryField>> {
        self.state
            .lock()
            .unwrap()
            .reorder_requests
            .push(request.clone());
        let gate = self.reorder_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("reorder_fields")?;

        self.with_directory(directory_id, |d| {
            for entry in &request.fields {
                let field = d
                    .fields
                    .iter_mut()
                    .find(|f| f.id == entry.id)
                    .ok_or_else(|| AppError::from_status(404, "Field not found"))?;
                field.sort_order = entry.sort_order;
            }
            sort_fields(&mut d.fields);
            // The backend answers in insertion order, not display order.
            let mut answer = d.fields.clone();
            answer.reverse();
            Ok(answer)
        })
    }

    async fn field_stats(
        &self,
        _directory_id: DirectoryId,
        field_id: FieldId,
    ) -> AppResult<FieldStats> {
        self.record("field_stats")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .stats
            .get(&field_id)
            .copied()
            .unwrap_or_default())
    }

    async fn create_record(
        &self,
        directory_id: DirectoryId,
        request: &CreateRecordRequest,
    ) -> AppResult<DirectoryRecord> {
        self.record("create_record")?;
        self.with_directory(directory_id, |d| {
            let record_id = RecordId::new();
            let record = DirectoryRecord {
                id: record_id,
                directory_id,
                created_at: None,
                updated_at: None,
                record_value: request
                    .values
                    .iter()
                    .map(|v| DirectoryValue {
                        id: Some(ValueId::new()),
                        field_id: v.field_id,
                        record_id,
                        value: v.value.clone(),
                    })
                    .collect(),
            };
            d.records.push(record.clone());
            Ok(record)
        })
    }

    async fn upsert_values(
        &self,
        directory_id: DirectoryId,
        request: &UpsertValuesRequest,
    ) -> AppResult<Vec<DirectoryValue>> {
        self.record("upsert_values")?;
        self.state
            .lock()
            .unwrap()
            .upsert_requests
            .push(request.clone());
        self.with_directory(directory_id, |d| {
            let mut saved = Vec::new();
            for upsert in &request.values {
                let record = d
                    .records
                    .iter_mut()
                    .find(|r| r.id == upsert.record_id)
                    .ok_or_else(|| AppError::from_status(404, "Record not found"))?;
                let value = match record
                    .record_value
                    .iter_mut()
                    .find(|v| v.field_id == upsert.field_id)
                {
                    Some(existing) => {
                        existing.value = upsert.value.clone();
                        existing.clone()
                    }
                    None => {
                        let value = DirectoryValue {
                            id: Some(ValueId::new()),
                            field_id: upsert.field_id,
                            record_id: upsert.record_id,
                            value: upsert.value.clone(),
                        };
                        record.record_value.push(value.clone());
                        value
                    }
                };
                saved.push(value);
            }
            Ok(saved)
        })
    }
}

/// A field of `directory_id` at `sort_order`.
pub fn field(directory_id: DirectoryId, name: &str, sort_order: i64) -> DirectoryField {
    DirectoryField {
        id: FieldId::new(),
        directory_id,
        name: name.to_string(),
        display_name: name.to_uppercase(),
        field_type: FieldType::String,
        is_system: false,
        is_required: false,
        is_unique: false,
        default_value: None,
        sort_order,
    }
}

/// An active directory of `year` with the given fields.
pub fn directory(id: DirectoryId, name: &str, year: i32, fields: Vec<DirectoryField>) -> Directory {
    Directory {
        id,
        name: name.to_string(),
        display_name: name.to_lowercase(),
        description: None,
        is_system: false,
        is_active: true,
        year,
        created_at: None,
        updated_at: None,
        fields,
        records: Vec::new(),
    }
}

/// Names of fields in order, with their positions.
pub fn order(fields: &[DirectoryField]) -> Vec<(String, i64)> {
    fields
        .iter()
        .map(|f| (f.name.clone(), f.sort_order))
        .collect()
}

/// A backend with one directory holding fields `a`, `b`, `c`.
pub struct TestDesk {
    /// Fake backend.
    pub api: Arc<FakeDirectoryApi>,
    /// Recorded notices.
    pub notifier: MemoryNotifier,
    /// The directory under test.
    pub directory_id: DirectoryId,
}

impl TestDesk {
    /// Fixture with three plain fields.
    pub fn new() -> Self {
        let directory_id = DirectoryId::new();
        let fields = vec![
            field(directory_id, "a", 0),
            field(directory_id, "b", 1),
            field(directory_id, "c", 2),
        ];
        Self::with_directory(directory(directory_id, "REGION", 2025, fields))
    }

    /// Fixture around a prepared directory.
    pub fn with_directory(directory: Directory) -> Self {
        let directory_id = directory.id;
        Self {
            api: Arc::new(FakeDirectoryApi::with_directories(vec![directory])),
            notifier: MemoryNotifier::new(),
            directory_id,
        }
    }

    /// The backend as the services see it.
    pub fn api(&self) -> Arc<dyn DirectoryApi> {
        Arc::clone(&self.api) as Arc<dyn DirectoryApi>
    }

    /// The notifier as the services see it.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.notifier.clone())
    }

    /// Field service over the directory, with the list already fetched.
    pub async fn field_service(&self) -> FieldService {
        let service = FieldService::new(self.api(), self.notifier(), self.directory_id, DEBOUNCE);
        service.refetch().await;
        service
    }
}
