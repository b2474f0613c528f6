//! Results of write operations.

use serde::{Deserialize, Serialize};

/// Counts reported by an update.
///
/// `matched == 0` means no document was addressed by the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Documents selected by the filter (0 or 1).
    pub matched: u64,
    /// Documents whose stored content changed (0 or 1).
    pub modified: u64,
}

impl UpdateOutcome {
    /// Returns `true` if the filter selected a document.
    pub fn is_match(&self) -> bool {
        self.matched > 0
    }
}

/// Count reported by a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// Documents removed (0 or 1).
    pub deleted: u64,
}

impl DeleteOutcome {
    /// Returns `true` if a document was removed.
    pub fn is_match(&self) -> bool {
        self.deleted > 0
    }
}
