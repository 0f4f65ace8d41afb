//! Which field attributes may still be changed.

use std::fmt;

use admissions_entity::field::{DirectoryField, FieldStats};

/// Why a control is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// Usage statistics have not arrived yet.
    Loading,
    /// Usage statistics could not be fetched.
    Unavailable,
    /// Records reference the field.
    RelatedRecords,
    /// The field carries a default value.
    DefaultValue,
    /// Records reference the field and it carries a default value.
    RelatedRecordsAndDefaultValue,
    /// System fields keep their uniqueness.
    SystemField,
}

impl LockReason {
    /// Tooltip shown on the locked control.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Loading => "Checking field usage...",
            Self::Unavailable => "Field usage could not be checked",
            Self::RelatedRecords => "Cannot be changed because the field has related records",
            Self::DefaultValue => "Cannot be changed because the field has a default value",
            Self::RelatedRecordsAndDefaultValue => {
                "Cannot be changed because the field has related records and a default value"
            }
            Self::SystemField => "Uniqueness of a system field cannot be changed",
        }
    }

    fn from_usage(has_related_records: bool, has_default_value: bool) -> Option<Self> {
        match (has_related_records, has_default_value) {
            (true, true) => Some(Self::RelatedRecordsAndDefaultValue),
            (true, false) => Some(Self::RelatedRecords),
            (false, true) => Some(Self::DefaultValue),
            (false, false) => None,
        }
    }
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Lock state of the edit form's type and uniqueness controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditLock {
    /// Set when the type may not change.
    pub field_type: Option<LockReason>,
    /// Set when the unique flag may not change.
    pub unique: Option<LockReason>,
}

impl EditLock {
    /// Nothing locked: the create form.
    pub fn unlocked() -> Self {
        Self::default()
    }

    /// Both controls locked until statistics arrive.
    pub fn loading() -> Self {
        Self::uniform(LockReason::Loading)
    }

    /// Both controls locked because statistics could not be fetched.
    pub fn unavailable() -> Self {
        Self::uniform(LockReason::Unavailable)
    }

    fn uniform(reason: LockReason) -> Self {
        Self {
            field_type: Some(reason),
            unique: Some(reason),
        }
    }

    /// Derive the lock from a field and its usage statistics.
    pub fn from_stats(field: &DirectoryField, stats: &FieldStats) -> Self {
        let has_default = stats.has_default_value || field.has_default_value();
        let usage = LockReason::from_usage(stats.has_related_records, has_default);
        let unique = if field.is_system {
            Some(LockReason::SystemField)
        } else {
            usage
        };

        Self {
            field_type: usage,
            unique,
        }
    }

    /// Whether the type control is locked.
    pub fn is_type_locked(&self) -> bool {
        self.field_type.is_some()
    }

    /// Whether the unique control is locked.
    pub fn is_unique_locked(&self) -> bool {
        self.unique.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions_core::types::{DirectoryId, FieldId};
    use admissions_entity::field::FieldType;

    fn field(is_system: bool, default_value: Option<&str>) -> DirectoryField {
        DirectoryField {
            id: FieldId::new(),
            directory_id: DirectoryId::new(),
            name: "code".to_string(),
            display_name: "Code".to_string(),
            field_type: FieldType::String,
            is_system,
            is_required: false,
            is_unique: false,
            default_value: default_value.map(str::to_string),
            sort_order: 0,
        }
    }

    fn stats(related: bool, default: bool) -> FieldStats {
        FieldStats {
            field_values_count: if related { 3 } else { 0 },
            has_related_records: related,
            has_default_value: default,
        }
    }

    #[test]
    fn test_unused_field_is_unlocked() {
        let lock = EditLock::from_stats(&field(false, None), &stats(false, false));
        assert_eq!(lock, EditLock::unlocked());
    }

    #[test]
    fn test_related_records_lock_both() {
        let lock = EditLock::from_stats(&field(false, None), &stats(true, false));
        assert_eq!(lock.field_type, Some(LockReason::RelatedRecords));
        assert_eq!(lock.unique, Some(LockReason::RelatedRecords));
    }

    #[test]
    fn test_default_value_from_field_or_stats() {
        let lock = EditLock::from_stats(&field(false, Some("x")), &stats(false, false));
        assert_eq!(lock.field_type, Some(LockReason::DefaultValue));

        let lock = EditLock::from_stats(&field(false, None), &stats(true, true));
        assert_eq!(
            lock.field_type,
            Some(LockReason::RelatedRecordsAndDefaultValue)
        );
    }

    #[test]
    fn test_system_field_locks_unique_only() {
        let lock = EditLock::from_stats(&field(true, None), &stats(false, false));
        assert!(!lock.is_type_locked());
        assert_eq!(lock.unique, Some(LockReason::SystemField));
        assert_eq!(
            lock.unique.map(|r| r.to_string()).as_deref(),
            Some("Uniqueness of a system field cannot be changed")
        );
    }

    #[test]
    fn test_loading_locks_everything() {
        let lock = EditLock::loading();
        assert!(lock.is_type_locked());
        assert!(lock.is_unique_locked());
        assert_eq!(lock.field_type, Some(LockReason::Loading));
    }
}
