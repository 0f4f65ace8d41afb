//! Directory field definitions and typed default values.

pub mod field_type;
pub mod model;
pub mod validation;
pub mod value;

pub use field_type::FieldType;
pub use model::{
    CreateFieldDto, DirectoryField, FieldStats, ReorderFieldEntry, ReorderFieldsRequest,
    UpdateFieldDto,
};
pub use value::{CoercionError, RawValue, TypedValue};
