//! Local reordering and payload validation.

use std::collections::HashSet;

use thiserror::Error;

use admissions_core::AppError;
use admissions_core::types::{DirectoryId, FieldId};
use admissions_entity::field::DirectoryField;

/// A candidate ordering that must not be applied or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderPayloadError {
    /// There is nothing to reorder.
    #[error("Invalid fields data: field list is empty")]
    Empty,

    /// A drag index does not point into the list.
    #[error("Index {index} is out of range for {len} fields")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// List length.
        len: usize,
    },

    /// A field carries the nil id.
    #[error("Invalid field structure: field at position {position} has no id")]
    MissingId {
        /// Position in the candidate list.
        position: usize,
    },

    /// The same field appears twice.
    #[error("Duplicate field id {0} in reorder payload")]
    DuplicateId(FieldId),

    /// A field belongs to another directory.
    #[error("Field {field_id} belongs to directory {actual}, not {expected}")]
    ForeignDirectory {
        /// Offending field.
        field_id: FieldId,
        /// Directory being reordered.
        expected: DirectoryId,
        /// Directory the field claims.
        actual: DirectoryId,
    },

    /// A field has a negative position.
    #[error("Field {field_id} has negative sort order {sort_order}")]
    NegativeSortOrder {
        /// Offending field.
        field_id: FieldId,
        /// Its position.
        sort_order: i64,
    },
}

impl From<ReorderPayloadError> for AppError {
    fn from(err: ReorderPayloadError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Move the field at `from` to `to` and renumber every `sort_order` to its
/// new 0-based index.
pub fn move_field(
    fields: &[DirectoryField],
    from: usize,
    to: usize,
) -> Result<Vec<DirectoryField>, ReorderPayloadError> {
    let len = fields.len();
    if len == 0 {
        return Err(ReorderPayloadError::Empty);
    }
    for index in [from, to] {
        if index >= len {
            return Err(ReorderPayloadError::IndexOutOfRange { index, len });
        }
    }

    let mut reordered = fields.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);

    for (position, field) in reordered.iter_mut().enumerate() {
        field.sort_order = position as i64;
    }

    Ok(reordered)
}

/// Check a candidate ordering before it touches state or the network.
pub fn validate_ordering(
    fields: &[DirectoryField],
    directory_id: DirectoryId,
) -> Result<(), ReorderPayloadError> {
    if fields.is_empty() {
        return Err(ReorderPayloadError::Empty);
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
        if field.id.is_nil() {
            return Err(ReorderPayloadError::MissingId { position });
        }
        if !seen.insert(field.id) {
            return Err(ReorderPayloadError::DuplicateId(field.id));
        }
        if field.directory_id != directory_id {
            return Err(ReorderPayloadError::ForeignDirectory {
                field_id: field.id,
                expected: directory_id,
                actual: field.directory_id,
            });
        }
        if field.sort_order < 0 {
            return Err(ReorderPayloadError::NegativeSortOrder {
                field_id: field.id,
                sort_order: field.sort_order,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions_entity::field::FieldType;
    use uuid::Uuid;

    fn field(directory_id: DirectoryId, name: &str, sort_order: i64) -> DirectoryField {
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

    fn names(fields: &[DirectoryField]) -> Vec<(&str, i64)> {
        fields
            .iter()
            .map(|f| (f.name.as_str(), f.sort_order))
            .collect()
    }

    #[test]
    fn test_move_last_to_front() {
        let dir = DirectoryId::new();
        let fields = vec![field(dir, "a", 0), field(dir, "b", 1), field(dir, "c", 2)];
        let moved = move_field(&fields, 2, 0).unwrap();
        assert_eq!(names(&moved), vec![("c", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_move_renumbers_sparse_orders() {
        let dir = DirectoryId::new();
        let fields = vec![field(dir, "a", 10), field(dir, "b", 20), field(dir, "c", 35)];
        let moved = move_field(&fields, 0, 1).unwrap();
        assert_eq!(names(&moved), vec![("b", 0), ("a", 1), ("c", 2)]);
    }

    #[test]
    fn test_move_out_of_range() {
        let dir = DirectoryId::new();
        let fields = vec![field(dir, "a", 0)];
        assert_eq!(
            move_field(&fields, 0, 3),
            Err(ReorderPayloadError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(move_field(&[], 0, 0), Err(ReorderPayloadError::Empty));
    }

    #[test]
    fn test_validate_accepts_clean_ordering() {
        let dir = DirectoryId::new();
        let fields = vec![field(dir, "a", 0), field(dir, "b", 1)];
        assert_eq!(validate_ordering(&fields, dir), Ok(()));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let dir = DirectoryId::new();
        let a = field(dir, "a", 0);
        let mut b = field(dir, "b", 1);
        b.id = a.id;
        assert_eq!(
            validate_ordering(&[a.clone(), b], dir),
            Err(ReorderPayloadError::DuplicateId(a.id))
        );
    }

    #[test]
    fn test_validate_rejects_foreign_directory() {
        let dir = DirectoryId::new();
        let other = DirectoryId::new();
        let stray = field(other, "b", 1);
        let err = validate_ordering(&[field(dir, "a", 0), stray.clone()], dir).unwrap_err();
        assert_eq!(
            err,
            ReorderPayloadError::ForeignDirectory {
                field_id: stray.id,
                expected: dir,
                actual: other,
            }
        );
    }

    #[test]
    fn test_validate_rejects_nil_id_and_negative_order() {
        let dir = DirectoryId::new();
        let mut nil = field(dir, "a", 0);
        nil.id = FieldId::from_uuid(Uuid::nil());
        assert_eq!(
            validate_ordering(&[nil], dir),
            Err(ReorderPayloadError::MissingId { position: 0 })
        );

        let negative = field(dir, "a", -1);
        assert!(matches!(
            validate_ordering(&[negative], dir),
            Err(ReorderPayloadError::NegativeSortOrder { sort_order: -1, .. })
        ));
        assert_eq!(validate_ordering(&[], dir), Err(ReorderPayloadError::Empty));
    }
}
