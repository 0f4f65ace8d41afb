//! Directory catalog and the records view of one directory.

pub mod catalog;
pub mod content;
pub mod record;

pub use catalog::{CatalogState, DirectoryCatalog};
pub use content::{Cell, ContentRow, DirectoryContent};
pub use record::{RecordError, build_record};
