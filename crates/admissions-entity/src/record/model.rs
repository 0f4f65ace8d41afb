//! Record and value entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use admissions_core::types::{DirectoryId, FieldId, RecordId, ValueId};

/// A row of a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning directory.
    pub directory_id: DirectoryId,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// One value per field that has one.
    #[serde(default)]
    pub record_value: Vec<DirectoryValue>,
}

impl DirectoryRecord {
    /// The stored value for a field, if any.
    pub fn value_for(&self, field_id: FieldId) -> Option<&DirectoryValue> {
        self.record_value.iter().find(|v| v.field_id == field_id)
    }
}

/// A single stored value. Always a string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryValue {
    /// Value identifier; absent for values not yet persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ValueId>,
    /// Field the value belongs to.
    pub field_id: FieldId,
    /// Record the value belongs to.
    pub record_id: RecordId,
    /// Stored text.
    pub value: String,
}

/// One value of a record being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecordValue {
    /// Target field.
    pub field_id: FieldId,
    /// Canonical stored text.
    pub value: String,
}

/// Body of `POST /api/directories/:id/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    /// Values of the new record.
    pub values: Vec<NewRecordValue>,
}

/// One entry of a value upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueUpsert {
    /// Existing value identifier, absent to insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ValueId>,
    /// Target field.
    pub field_id: FieldId,
    /// Target record.
    pub record_id: RecordId,
    /// Stored text.
    pub value: String,
}

/// Body of `PUT /api/directories/:id/values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertValuesRequest {
    /// Values to insert or update.
    pub values: Vec<ValueUpsert>,
}
