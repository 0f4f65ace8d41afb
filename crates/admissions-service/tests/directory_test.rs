//! Integration tests for the directory catalog and the records view.

mod helpers;

use std::collections::HashMap;

use admissions_core::error::{AppError, ErrorKind};
use admissions_core::types::{DirectoryId, RecordId, ValueId};
use admissions_entity::directory::CreateDirectory;
use admissions_entity::field::FieldType;
use admissions_entity::record::{DirectoryRecord, DirectoryValue};
use admissions_service::{DirectoryCatalog, DirectoryContent};

use helpers::{FakeDirectoryApi, TestDesk, directory, field};

fn catalog_desk() -> (TestDesk, DirectoryCatalog) {
    let desk = TestDesk::new();
    let older = directory(DirectoryId::new(), "LEGACY", 2024, Vec::new());
    let mut system = directory(DirectoryId::new(), "COUNTRY", 2025, Vec::new());
    system.is_system = true;
    let api = FakeDirectoryApi::with_directories(vec![
        desk.api.directory(desk.directory_id),
        older,
        system,
    ]);
    let desk = TestDesk {
        api: std::sync::Arc::new(api),
        ..desk
    };
    let catalog = DirectoryCatalog::new(desk.api(), desk.notifier());
    (desk, catalog)
}

#[tokio::test]
async fn test_load_filters_by_year() {
    let (_desk, catalog) = catalog_desk();
    let receiver = catalog.subscribe();

    let directories = catalog.load(Some(2025)).await;
    assert_eq!(directories.len(), 2);
    assert_eq!(catalog.year(), Some(2025));
    assert_eq!(receiver.borrow().directories.len(), 2);

    assert_eq!(catalog.load(None).await.len(), 3);
}

#[tokio::test]
async fn test_load_failure_degrades_to_empty() {
    let (desk, catalog) = catalog_desk();
    catalog.load(Some(2025)).await;

    desk.api.fail_next(
        "list_directories",
        AppError::from_status(401, "Unauthorized"),
    );
    assert!(catalog.load(Some(2025)).await.is_empty());
    assert!(catalog.directories().is_empty());
    assert_eq!(
        desk.notifier.last().unwrap().message,
        "Failed to load directories: Unauthorized"
    );
}

#[tokio::test]
async fn test_create_validates_before_sending() {
    let (desk, catalog) = catalog_desk();
    catalog.load(Some(2025)).await;

    let err = catalog
        .create(CreateDirectory::new("SCHOOL", "S", 2025))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Display name must be at least 2 characters long");
    assert_eq!(desk.api.calls("create_directory"), 0);

    let created = catalog
        .create(CreateDirectory::new("SCHOOL", "Schools", 2025))
        .await
        .unwrap();
    assert_eq!(created.name, "SCHOOL");
    assert!(catalog.directories().iter().any(|d| d.id == created.id));
}

#[tokio::test]
async fn test_system_directory_is_not_deleted() {
    let (desk, catalog) = catalog_desk();
    let directories = catalog.load(Some(2025)).await;
    let system = directories.iter().find(|d| d.is_system).unwrap();

    let err = catalog.delete(system.id).await.unwrap_err();
    assert_eq!(err.message, "System directories cannot be deleted");
    assert_eq!(desk.api.calls("delete_directory"), 0);

    catalog.delete(desk.directory_id).await.unwrap();
    assert_eq!(catalog.directories().len(), 1);
}

fn content_desk() -> (TestDesk, RecordId) {
    let directory_id = DirectoryId::new();
    let mut score = field(directory_id, "score", 0);
    score.field_type = FieldType::Number;
    score.is_required = true;
    let note = field(directory_id, "note", 1);

    let record_id = RecordId::new();
    let mut fixture = directory(directory_id, "EXAMS", 2025, vec![note.clone(), score.clone()]);
    fixture.records.push(DirectoryRecord {
        id: record_id,
        directory_id,
        created_at: None,
        updated_at: None,
        record_value: vec![DirectoryValue {
            id: Some(ValueId::new()),
            field_id: score.id,
            record_id,
            value: "10".to_string(),
        }],
    });
    (TestDesk::with_directory(fixture), record_id)
}

#[tokio::test]
async fn test_rows_have_a_cell_per_field() {
    let (desk, record_id) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();

    let fields = content.fields().await;
    assert_eq!(fields[0].name, "score");
    let rows = content.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record_id, record_id);
    assert_eq!(rows[0].cells[0].value, "10");
    assert_eq!(rows[0].cells[1].value, "");
    assert!(rows[0].cells[1].value_id.is_none());
}

#[tokio::test]
async fn test_invalid_cell_blocks_save() {
    let (desk, record_id) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let score = content.fields().await[0].clone();

    content.begin_edit().await;
    content.set_cell(record_id, score.id, "ten").await.unwrap();
    let err = content.save().await.unwrap_err();

    assert_eq!(err.message, "SCORE: Value must be a number");
    assert!(content.is_editing().await);
    assert_eq!(desk.api.calls("upsert_values"), 0);
}

#[tokio::test]
async fn test_save_upserts_changed_cells_only() {
    let (desk, record_id) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let fields = content.fields().await;

    content.begin_edit().await;
    content.set_cell(record_id, fields[0].id, "12.50").await.unwrap();
    content.save().await.unwrap();

    let requests = desk.api.upsert_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].values.len(), 1);
    assert_eq!(requests[0].values[0].value, "12.5");
    assert!(requests[0].values[0].id.is_some());

    assert!(!content.is_editing().await);
    assert_eq!(content.rows().await[0].cells[0].value, "12.5");
    assert_eq!(desk.notifier.last().unwrap().message, "Changes saved");
}

#[tokio::test]
async fn test_new_row_requires_required_fields() {
    let (desk, _) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let fields = content.fields().await;

    content.begin_edit().await;
    content.set_new_row(fields[1].id, "late entry").await.unwrap();
    let err = content.save().await.unwrap_err();
    assert_eq!(err.message, "Field 'SCORE' is required");
    assert_eq!(desk.api.calls("create_record"), 0);

    content.set_new_row(fields[0].id, "7").await.unwrap();
    content.save().await.unwrap();
    assert_eq!(desk.api.calls("create_record"), 1);
    assert_eq!(content.rows().await.len(), 2);
}

#[tokio::test]
async fn test_retry_after_failed_upsert_does_not_duplicate_record() {
    let (desk, record_id) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let fields = content.fields().await;

    content.begin_edit().await;
    content.set_new_row(fields[0].id, "7").await.unwrap();
    content.set_cell(record_id, fields[1].id, "checked").await.unwrap();

    desk.api
        .fail_next("upsert_values", AppError::from_status(500, "Server error"));
    assert!(content.save().await.is_err());
    assert_eq!(desk.api.calls("create_record"), 1);
    assert!(content.is_editing().await);

    content.save().await.unwrap();
    assert_eq!(desk.api.calls("create_record"), 1);
    assert_eq!(desk.api.calls("upsert_values"), 2);

    let rows = content.rows().await;
    assert_eq!(rows.len(), 2);
    let edited = rows.iter().find(|r| r.record_id == record_id).unwrap();
    assert_eq!(edited.cells[1].value, "checked");
}

#[tokio::test]
async fn test_cancel_discards_edits() {
    let (desk, record_id) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let fields = content.fields().await;

    content.begin_edit().await;
    content.set_cell(record_id, fields[1].id, "draft").await.unwrap();
    assert_eq!(content.rows().await[0].cells[1].value, "draft");
    content.cancel().await;

    assert_eq!(content.rows().await[0].cells[1].value, "");
    assert!(content.set_cell(record_id, fields[1].id, "x").await.is_err());
}

#[tokio::test]
async fn test_create_record_coerces_values() {
    let (desk, _) = content_desk();
    let content = DirectoryContent::new(desk.api(), desk.notifier(), desk.directory_id);
    content.load().await.unwrap();
    let fields = content.fields().await;

    let values = HashMap::from([(fields[0].id, "0x10".to_string())]);
    let record = content.create_record(&values).await.unwrap();
    assert_eq!(record.value_for(fields[0].id).unwrap().value, "16");
}
