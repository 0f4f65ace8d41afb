//! Field list store for one directory.

use std::sync::Arc;

use tokio::sync::watch;

use admissions_core::types::DirectoryId;
use admissions_entity::field::DirectoryField;

/// The displayed field list of one directory.
///
/// Writers replace the whole list; every view holding a receiver from
/// [`FieldStore::subscribe`] observes each replacement, including
/// optimistic reorders and rollbacks.
#[derive(Debug, Clone)]
pub struct FieldStore {
    /// Directory the fields belong to.
    directory_id: DirectoryId,
    /// Current list, in display order.
    sender: Arc<watch::Sender<Vec<DirectoryField>>>,
}

impl FieldStore {
    /// Create an empty store for a directory.
    pub fn new(directory_id: DirectoryId) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            directory_id,
            sender: Arc::new(sender),
        }
    }

    /// Create a store seeded with fields.
    pub fn with_fields(directory_id: DirectoryId, fields: Vec<DirectoryField>) -> Self {
        let store = Self::new(directory_id);
        store.replace(fields);
        store
    }

    /// The directory this store belongs to.
    pub fn directory_id(&self) -> DirectoryId {
        self.directory_id
    }

    /// Copy of the current list.
    pub fn snapshot(&self) -> Vec<DirectoryField> {
        self.sender.borrow().clone()
    }

    /// Number of fields currently displayed.
    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }

    /// Replace the list and notify subscribers.
    pub fn replace(&self, fields: Vec<DirectoryField>) {
        self.sender.send_replace(fields);
    }

    /// Observe the list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<DirectoryField>> {
        self.sender.subscribe()
    }
}
