//! Field editing: form state, edit locks and CRUD orchestration.

pub mod editor;
pub mod lock;
pub mod service;

pub use editor::{EditorMode, FieldDraft, FieldEditor, FieldFormError, StatsState};
pub use lock::{EditLock, LockReason};
pub use service::FieldService;
