//! Latest-wins coordination of overlapping asynchronous operations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one issued operation. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationToken(u64);

impl OperationToken {
    /// The numeric value of the token.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// Issues operation tokens and tells whether a completing operation is
/// still the latest one.
///
/// Only the result of the most recently issued token may be applied;
/// anything older is stale and must be dropped by the caller.
#[derive(Debug, Default)]
pub struct LatestWins {
    latest: AtomicU64,
}

impl LatestWins {
    /// Create a coordinator that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> OperationToken {
        OperationToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `token` is the most recently issued token.
    pub fn is_current(&self, token: OperationToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// Supersede every issued token without starting a new operation.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}
