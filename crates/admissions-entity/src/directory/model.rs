//! Directory entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use admissions_core::types::DirectoryId;

use crate::field::DirectoryField;
use crate::record::DirectoryRecord;

/// An admin-defined dictionary with typed fields and rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    /// Unique directory identifier.
    pub id: DirectoryId,
    /// System name, e.g. `EDUCATION_LEVEL`.
    pub name: String,
    /// Label shown to users.
    pub display_name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// System directories cannot be deleted.
    #[serde(default)]
    pub is_system: bool,
    /// Whether the directory is in use.
    #[serde(default)]
    pub is_active: bool,
    /// Admission year the directory belongs to.
    pub year: i32,
    /// When the directory was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the directory was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Field definitions.
    #[serde(default)]
    pub fields: Vec<DirectoryField>,
    /// Rows.
    #[serde(default)]
    pub records: Vec<DirectoryRecord>,
}

impl Directory {
    /// Fields ordered by `sort_order`, ties broken by display name.
    pub fn ordered_fields(&self) -> Vec<DirectoryField> {
        let mut fields = self.fields.clone();
        sort_fields(&mut fields);
        fields
    }
}

/// Sort fields into display order.
pub fn sort_fields(fields: &mut [DirectoryField]) {
    fields.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
}

/// Body of `POST /api/directories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectory {
    /// System name.
    #[validate(length(min = 1, message = "System name is required"))]
    pub name: String,
    /// Label.
    #[validate(length(min = 2, message = "Display name must be at least 2 characters long"))]
    pub display_name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// System flag.
    pub is_system: bool,
    /// Active flag.
    pub is_active: bool,
    /// Admission year.
    #[validate(range(min = 2000, max = 2100, message = "Year is out of range"))]
    pub year: i32,
}

impl CreateDirectory {
    /// A new active, non-system directory for the given year.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into().trim().to_string(),
            display_name: display_name.into().trim().to_string(),
            description: None,
            is_system: false,
            is_active: true,
            year,
        }
    }
}
