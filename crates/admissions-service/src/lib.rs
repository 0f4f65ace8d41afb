//! # admissions-service
//!
//! Client-side logic of the directory editor. Each service orchestrates
//! the [`DirectoryApi`](admissions_client::DirectoryApi), the shared state
//! stores, and the notifier to implement one user-facing use case.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod directory;
pub mod field;
pub mod notify;
pub mod reorder;
pub mod store;

pub use directory::{DirectoryCatalog, DirectoryContent};
pub use field::{EditLock, EditorMode, FieldEditor, FieldService};
pub use notify::{MemoryNotifier, TracingNotifier};
pub use reorder::{LatestWins, ReorderController, ReorderEvent};
pub use store::FieldStore;
