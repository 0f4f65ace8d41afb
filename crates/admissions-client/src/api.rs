//! Directory API trait.

use async_trait::async_trait;

use admissions_core::AppResult;
use admissions_core::types::{DirectoryId, FieldId};
use admissions_entity::directory::{CreateDirectory, Directory};
use admissions_entity::field::{
    CreateFieldDto, DirectoryField, FieldStats, ReorderFieldsRequest, UpdateFieldDto,
};
use admissions_entity::record::{
    CreateRecordRequest, DirectoryRecord, DirectoryValue, UpsertValuesRequest,
};

/// Operations the admissions backend exposes for directories.
///
/// The backend owns persistence and authorization; every method is a single
/// request. Non-2xx responses surface as [`admissions_core::AppError`] with
/// the HTTP status and the backend's `message`.
#[async_trait]
pub trait DirectoryApi: Send + Sync + std::fmt::Debug + 'static {
    /// `GET /api/directories[?year=]`
    async fn list_directories(&self, year: Option<i32>) -> AppResult<Vec<Directory>>;

    /// `POST /api/directories`
    async fn create_directory(&self, request: &CreateDirectory) -> AppResult<Directory>;

    /// `GET /api/directories/:id` (fields and records included).
    async fn get_directory(&self, directory_id: DirectoryId) -> AppResult<Directory>;

    /// `DELETE /api/directories/:id`
    async fn delete_directory(&self, directory_id: DirectoryId) -> AppResult<()>;

    /// `POST /api/directories/:id/fields`
    async fn create_field(
        &self,
        directory_id: DirectoryId,
        request: &CreateFieldDto,
    ) -> AppResult<DirectoryField>;

    /// `PATCH /api/directories/:id/fields/:fieldId`
    async fn update_field(
        &self,
        directory_id: DirectoryId,
        field_id: FieldId,
        request: &UpdateFieldDto,
    ) -> AppResult<DirectoryField>;

    /// `DELETE /api/directories/:id/fields/:fieldId`
    async fn delete_field(&self, directory_id: DirectoryId, field_id: FieldId) -> AppResult<()>;

    /// `PATCH /api/directories/:id/fields/reorder`
    async fn reorder_fields(
        &self,
        directory_id: DirectoryId,
        request: &ReorderFieldsRequest,
    ) -> AppResult<Vec<DirectoryField>>;

    /// `GET /api/directories/:id/fields/:fieldId/stats`
    async fn field_stats(
        &self,
        directory_id: DirectoryId,
        field_id: FieldId,
    ) -> AppResult<FieldStats>;

    /// `POST /api/directories/:id/records`
    async fn create_record(
        &self,
        directory_id: DirectoryId,
        request: &CreateRecordRequest,
    ) -> AppResult<DirectoryRecord>;

    /// `PUT /api/directories/:id/values`
    async fn upsert_values(
        &self,
        directory_id: DirectoryId,
        request: &UpsertValuesRequest,
    ) -> AppResult<Vec<DirectoryValue>>;
}
