//! Mutation reports.
//!
//! Every mutation returns a `ChangeSet` naming the fields/positions it
//! touched, so a UI layer can repaint exactly what changed instead of
//! observing the stores directly.

use serde::{Deserialize, Serialize};

/// An inclusive span of touched positions within one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedSpan {
    pub field: String,
    pub start: usize,
    pub end: usize,
}

/// What one logical mutation touched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub spans: Vec<ChangedSpan>,
    /// True when the frame order itself changed (insert/delete/move);
    /// consumers should treat every position as dirty.
    #[serde(default)]
    pub structural: bool,
}

impl ChangeSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structural() -> Self {
        Self {
            spans: Vec::new(),
            structural: true,
        }
    }

    #[inline]
    pub fn push(&mut self, field: impl Into<String>, start: usize, end: usize) {
        self.spans.push(ChangedSpan {
            field: field.into(),
            start,
            end,
        });
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && !self.structural
    }

    /// Fold another report into this one (chained edits).
    pub fn merge(&mut self, other: ChangeSet) {
        self.structural |= other.structural;
        self.spans.extend(other.spans);
    }
}
