//! Field reorder persistence configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the drag-and-drop reorder pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderConfig {
    /// Debounce window in milliseconds; drops inside it collapse into one request.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl ReorderConfig {
    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}
