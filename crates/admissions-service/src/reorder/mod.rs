//! Drag-and-drop field reordering.
//!
//! A drop is applied to the [`FieldStore`](crate::store::FieldStore)
//! immediately, persisted after a debounce window, and then either
//! committed with the server's list or rolled back to the pre-drag list.

pub mod controller;
pub mod coordinator;
pub mod failure;
pub mod payload;
pub mod transaction;

pub use controller::{DropOutcome, ReorderController, ReorderError, ReorderEvent, ReorderPhase};
pub use coordinator::{LatestWins, OperationToken};
pub use failure::ReorderFailure;
pub use payload::{ReorderPayloadError, move_field, validate_ordering};
pub use transaction::{ReorderTransaction, TransactionState};
