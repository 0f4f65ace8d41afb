//! Field CRUD orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use admissions_client::DirectoryApi;
use admissions_core::AppResult;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::{DirectoryId, FieldId, Notice};
use admissions_entity::field::{DirectoryField, FieldStats};

use crate::reorder::ReorderController;
use crate::store::FieldStore;

use super::editor::{FieldEditor, FieldFormError};
use super::lock::EditLock;

/// Creates, updates and deletes the fields of one directory and keeps the
/// shared field list in step with the backend.
#[derive(Debug, Clone)]
pub struct FieldService {
    /// Directory being edited.
    directory_id: DirectoryId,
    /// Backend access.
    api: Arc<dyn DirectoryApi>,
    /// User-facing notices.
    notifier: Arc<dyn Notifier>,
    /// Displayed field list.
    store: FieldStore,
    /// Drag-and-drop reordering over the same list.
    reorder: ReorderController,
}

impl FieldService {
    /// Creates a field service for a directory.
    pub fn new(
        api: Arc<dyn DirectoryApi>,
        notifier: Arc<dyn Notifier>,
        directory_id: DirectoryId,
        reorder_debounce: Duration,
    ) -> Self {
        let store = FieldStore::new(directory_id);
        let reorder = ReorderController::new(
            Arc::clone(&api),
            store.clone(),
            Arc::clone(&notifier),
            reorder_debounce,
        );
        Self {
            directory_id,
            api,
            notifier,
            store,
            reorder,
        }
    }

    /// The directory this service edits.
    pub fn directory_id(&self) -> DirectoryId {
        self.directory_id
    }

    /// The shared field list.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// The reorder controller bound to the field list.
    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    /// Fetch the directory and replace the field list with its fields in
    /// display order. On failure the list is emptied and a notice is shown.
    pub async fn refetch(&self) -> Vec<DirectoryField> {
        let fields = match self.api.get_directory(self.directory_id).await {
            Ok(directory) => directory.ordered_fields(),
            Err(e) => {
                warn!(directory_id = %self.directory_id, error = %e, "Failed to fetch fields");
                self.notifier
                    .notify(Notice::error(format!("Failed to load fields: {}", e.message)));
                Vec::new()
            }
        };
        self.reorder.reset(fields.clone()).await;
        fields
    }

    /// Submit the create form.
    pub async fn create(&self, editor: &mut FieldEditor) -> AppResult<DirectoryField> {
        let request = editor
            .build_create_request()
            .inspect_err(|e| self.reject(e))?;

        match self.api.create_field(self.directory_id, &request).await {
            Ok(field) => {
                info!(
                    directory_id = %self.directory_id,
                    field_id = %field.id,
                    name = %field.name,
                    "Field created"
                );
                editor.reset_create_draft();
                self.refetch().await;
                self.notifier.notify(Notice::success("Field created"));
                Ok(field)
            }
            Err(e) => Err(self.failed("create field", e)),
        }
    }

    /// Submit the edit form with only the changed attributes.
    pub async fn update(&self, editor: &mut FieldEditor) -> AppResult<DirectoryField> {
        let (field_id, request) = match editor.build_update_request() {
            Ok(parts) => parts,
            Err(FieldFormError::NoChanges) => {
                self.notifier
                    .notify(Notice::info(FieldFormError::NoChanges.to_string()));
                return Err(FieldFormError::NoChanges.into());
            }
            Err(e) => {
                self.reject(&e);
                return Err(e.into());
            }
        };

        match self
            .api
            .update_field(self.directory_id, field_id, &request)
            .await
        {
            Ok(field) => {
                info!(
                    directory_id = %self.directory_id,
                    %field_id,
                    changed = request.len(),
                    "Field updated"
                );
                editor.start_create();
                self.refetch().await;
                self.notifier.notify(Notice::success("Field updated"));
                Ok(field)
            }
            Err(e) => Err(self.failed("update field", e)),
        }
    }

    /// Delete a field. System fields are refused without contacting the
    /// backend.
    pub async fn delete(&self, editor: &mut FieldEditor, field: &DirectoryField) -> AppResult<()> {
        if field.is_system {
            let err = AppError::validation("System fields cannot be deleted");
            self.notifier.notify(Notice::error(err.message.clone()));
            return Err(err);
        }

        match self.api.delete_field(self.directory_id, field.id).await {
            Ok(()) => {
                info!(directory_id = %self.directory_id, field_id = %field.id, "Field deleted");
                if editor.selected().is_some_and(|s| s.id == field.id) {
                    editor.start_create();
                }
                self.refetch().await;
                self.notifier.notify(Notice::success("Field deleted"));
                Ok(())
            }
            Err(e) => Err(self.failed("delete field", e)),
        }
    }

    /// Fetch usage statistics of a field.
    pub async fn stats(&self, field_id: FieldId) -> AppResult<FieldStats> {
        self.api.field_stats(self.directory_id, field_id).await
    }

    /// Open a field in the edit form and load its statistics.
    ///
    /// A failed fetch keeps the type and unique controls locked.
    pub async fn select_field(&self, editor: &mut FieldEditor, field: &DirectoryField) -> EditLock {
        editor.select_field(field);

        let stats = match self.stats(field.id).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(field_id = %field.id, error = %e, "Failed to fetch field stats");
                self.notifier.notify(Notice::error(format!(
                    "Failed to load field usage: {}",
                    e.message
                )));
                None
            }
        };
        editor.apply_stats(field.id, stats);
        editor.lock()
    }

    fn reject(&self, err: &FieldFormError) {
        self.notifier.notify(Notice::error(err.to_string()));
    }

    fn failed(&self, action: &str, err: AppError) -> AppError {
        warn!(directory_id = %self.directory_id, error = %err, "Failed to {action}");
        self.notifier.notify(Notice::error(err.message.clone()));
        err
    }
}
