//! Optimistic reorder transaction.

use admissions_entity::field::DirectoryField;

use super::coordinator::OperationToken;

/// Lifecycle of a reorder transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Optimistic order applied, outcome unknown.
    Pending,
    /// The server confirmed an order.
    Committed,
    /// The pre-drag order was restored.
    RolledBack,
}

/// Snapshot-before / apply-optimistic / commit-or-rollback for one
/// persisted reorder.
///
/// The snapshot is the last order known to be good. A burst of drops
/// inside one debounce window shares the snapshot taken before the first
/// drop; only the token advances.
#[derive(Debug, Clone)]
pub struct ReorderTransaction {
    snapshot: Vec<DirectoryField>,
    token: OperationToken,
    state: TransactionState,
}

impl ReorderTransaction {
    /// Open a transaction for a drop.
    pub fn begin(snapshot: Vec<DirectoryField>, token: OperationToken) -> Self {
        Self {
            snapshot,
            token,
            state: TransactionState::Pending,
        }
    }

    /// Fold a later drop of the same burst into this transaction.
    pub fn supersede(&mut self, token: OperationToken) {
        self.token = token;
    }

    /// Token of the latest drop covered by this transaction.
    pub fn token(&self) -> OperationToken {
        self.token
    }

    /// Current state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// The pre-drag order.
    pub fn snapshot(&self) -> &[DirectoryField] {
        &self.snapshot
    }

    /// Accept the server's order. Returns it sorted for display.
    pub fn commit(&mut self, mut confirmed: Vec<DirectoryField>) -> Vec<DirectoryField> {
        admissions_entity::directory::model::sort_fields(&mut confirmed);
        self.state = TransactionState::Committed;
        confirmed
    }

    /// Give up the optimistic order. Returns the pre-drag order.
    pub fn rollback(&mut self) -> Vec<DirectoryField> {
        self.state = TransactionState::RolledBack;
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::coordinator::LatestWins;
    use admissions_core::types::{DirectoryId, FieldId};
    use admissions_entity::field::FieldType;

    fn field(directory_id: DirectoryId, name: &str, sort_order: i64) -> DirectoryField {
        DirectoryField {
            id: FieldId::new(),
            directory_id,
            name: name.to_string(),
            display_name: name.to_string(),
            field_type: FieldType::Number,
            is_system: false,
            is_required: false,
            is_unique: false,
            default_value: None,
            sort_order,
        }
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let dir = DirectoryId::new();
        let before = vec![field(dir, "a", 0), field(dir, "b", 1)];
        let tokens = LatestWins::new();
        let mut tx = ReorderTransaction::begin(before.clone(), tokens.issue());
        assert_eq!(tx.state(), TransactionState::Pending);
        assert_eq!(tx.rollback(), before);
        assert_eq!(tx.state(), TransactionState::RolledBack);
    }

    #[test]
    fn test_commit_sorts_server_order() {
        let dir = DirectoryId::new();
        let tokens = LatestWins::new();
        let mut tx = ReorderTransaction::begin(Vec::new(), tokens.issue());
        let confirmed = tx.commit(vec![field(dir, "b", 1), field(dir, "a", 0)]);
        assert_eq!(confirmed[0].name, "a");
        assert_eq!(tx.state(), TransactionState::Committed);
    }

    #[test]
    fn test_supersede_keeps_first_snapshot() {
        let dir = DirectoryId::new();
        let before = vec![field(dir, "a", 0)];
        let tokens = LatestWins::new();
        let mut tx = ReorderTransaction::begin(before.clone(), tokens.issue());
        let next = tokens.issue();
        tx.supersede(next);
        assert_eq!(tx.token(), next);
        assert_eq!(tx.snapshot(), before.as_slice());
    }
}
