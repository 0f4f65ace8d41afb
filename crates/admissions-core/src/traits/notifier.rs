//! Notification sink trait.

use crate::types::notice::Notice;

/// Receives user-facing notices from services.
///
/// Implementations exist for the console (CLI), for tracing-only
/// deployments, and an in-memory recorder used by tests and embedders.
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a notice. Must not block.
    fn notify(&self, notice: Notice);
}
