//! Directory record (row) and stored value entities.

pub mod model;

pub use model::{
    CreateRecordRequest, DirectoryRecord, DirectoryValue, NewRecordValue, UpsertValuesRequest,
    ValueUpsert,
};
