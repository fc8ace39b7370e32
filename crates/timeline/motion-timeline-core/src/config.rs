//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the editing surface. Keep this minimal; expand without
/// breaking the API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Idle window for coalescing consecutive value edits into one undo
    /// entry, in milliseconds.
    pub coalesce_window_ms: u64,
    /// Maximum retained undo entries; the oldest entry is evicted past this.
    pub max_undo_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: 500,
            max_undo_depth: 200,
        }
    }
}
