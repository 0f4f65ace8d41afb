//! Directory field entity model and request bodies.

use serde::{Deserialize, Serialize};

use admissions_core::types::{DirectoryId, FieldId};

use super::field_type::FieldType;

/// A typed column definition on a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryField {
    /// Unique field identifier.
    pub id: FieldId,
    /// The directory this field belongs to.
    pub directory_id: DirectoryId,
    /// System identifier used by application logic.
    pub name: String,
    /// Label shown to users.
    pub display_name: String,
    /// Logical value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// System fields cannot be deleted.
    #[serde(default)]
    pub is_system: bool,
    /// Whether every record must carry a value.
    #[serde(default)]
    pub is_required: bool,
    /// Whether values must be unique across records. Implies `is_required`.
    #[serde(default)]
    pub is_unique: bool,
    /// Default value in its stored string form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Position in display and edit order.
    #[serde(default)]
    pub sort_order: i64,
}

impl DirectoryField {
    /// Whether the field carries a non-empty default value.
    pub fn has_default_value(&self) -> bool {
        self.default_value
            .as_deref()
            .is_some_and(|v| !v.is_empty())
    }

    /// Short attribute summary, e.g. `NUMBER, Required, Unique`.
    pub fn attribute_summary(&self) -> String {
        let mut parts = vec![self.field_type.as_str()];
        if self.is_required {
            parts.push("Required");
        }
        if self.is_unique {
            parts.push("Unique");
        }
        if self.has_default_value() {
            parts.push("DefaultValue");
        }
        parts.join(", ")
    }
}

/// Usage statistics of a field, used to decide what may still be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    /// Number of stored values for the field.
    pub field_values_count: u64,
    /// Whether any record references the field.
    pub has_related_records: bool,
    /// Whether the field has a default value.
    pub has_default_value: bool,
}

/// Envelope of the stats endpoint: `{ "stats": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStatsResponse {
    /// The statistics.
    pub stats: FieldStats,
}

/// Body of `POST /api/directories/:id/fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldDto {
    /// System identifier.
    pub name: String,
    /// Label.
    pub display_name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Required flag.
    pub is_required: bool,
    /// Unique flag.
    pub is_unique: bool,
    /// Default value, omitted when the field has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// System flag.
    pub is_system: bool,
}

impl Default for CreateFieldDto {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            field_type: FieldType::String,
            is_required: false,
            is_unique: false,
            default_value: None,
            is_system: false,
        }
    }
}

/// Body of `PATCH /api/directories/:id/fields/:fieldId`.
///
/// Only changed attributes are present. `default_value` is tri-state:
/// absent (unchanged), `Some(None)` (cleared, sent as `null`) or
/// `Some(Some(v))` (set).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldDto {
    /// New system identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New value type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// New required flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    /// New unique flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    /// New default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Option<String>>,
}

impl UpdateFieldDto {
    /// Whether no attribute changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.display_name.is_none()
            && self.field_type.is_none()
            && self.is_required.is_none()
            && self.is_unique.is_none()
            && self.default_value.is_none()
    }

    /// Number of changed attributes.
    pub fn len(&self) -> usize {
        [
            self.name.is_some(),
            self.display_name.is_some(),
            self.field_type.is_some(),
            self.is_required.is_some(),
            self.is_unique.is_some(),
            self.default_value.is_some(),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }
}

/// One entry of the reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderFieldEntry {
    /// Field being positioned.
    pub id: FieldId,
    /// New position.
    pub sort_order: i64,
}

/// Body of `PATCH /api/directories/:id/fields/reorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderFieldsRequest {
    /// Every field of the directory with its new position.
    pub fields: Vec<ReorderFieldEntry>,
}

impl ReorderFieldsRequest {
    /// Build the request from an ordered field list.
    pub fn from_fields(fields: &[DirectoryField]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|f| ReorderFieldEntry {
                    id: f.id,
                    sort_order: f.sort_order,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_omits_unchanged() {
        let dto = UpdateFieldDto {
            display_name: Some("Region".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "displayName": "Region" }));
        assert_eq!(dto.len(), 1);
    }

    #[test]
    fn test_update_dto_clears_default_with_null() {
        let dto = UpdateFieldDto {
            default_value: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "defaultValue": null }));
        assert!(!dto.is_empty());
    }

    #[test]
    fn test_field_deserializes_backend_shape() {
        let json = serde_json::json!({
            "id": "7f1b5f7e-2a43-4c1e-9d0e-0d1f3f8c1a11",
            "directoryId": "0c8a3c51-47f5-4d0c-8a55-5a0bde0f6a92",
            "name": "region_code",
            "displayName": "Region code",
            "type": "NUMBER",
            "isSystem": false,
            "isRequired": true,
            "isUnique": true,
            "defaultValue": null,
            "sortOrder": 2,
            "createdAt": "2025-01-10T08:00:00.000Z"
        });
        let field: DirectoryField = serde_json::from_value(json).unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert_eq!(field.sort_order, 2);
        assert!(!field.has_default_value());
        assert_eq!(field.attribute_summary(), "NUMBER, Required, Unique");
    }
}
