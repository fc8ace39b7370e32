//! Bidirectional FrameId <-> array position index.
//!
//! The index is the only authority on where a logical frame currently sits.
//! After any structural change the position map is rebuilt before anything
//! else reads it, so lookups are never stale.

use hashbrown::HashMap;

use crate::ids::FrameId;

/// Maps stable frame identities to current array positions and back.
#[derive(Clone, Debug, Default)]
pub struct FrameIndex {
    ids: Vec<FrameId>,
    positions: HashMap<FrameId, usize>,
}

impl FrameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index with a fresh id sequence (full reload).
    pub fn set_ids(&mut self, ids: Vec<FrameId>) {
        self.ids = ids;
        self.rebuild();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id currently at `pos`, if in range.
    #[inline]
    pub fn id_at(&self, pos: usize) -> Option<FrameId> {
        self.ids.get(pos).copied()
    }

    /// Current position of `id`, if it still exists.
    #[inline]
    pub fn pos_of(&self, id: FrameId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Insert `id` at `pos`, shifting higher positions up by one.
    /// Out-of-range positions (beyond `len`) are a no-op.
    pub fn insert(&mut self, pos: usize, id: FrameId) {
        if pos > self.ids.len() {
            return;
        }
        self.ids.insert(pos, id);
        self.rebuild();
    }

    /// Remove the id at `pos`, shifting higher positions down by one.
    /// Out-of-range positions are a no-op and return `None`.
    pub fn remove_at(&mut self, pos: usize) -> Option<FrameId> {
        if pos >= self.ids.len() {
            return None;
        }
        let id = self.ids.remove(pos);
        self.rebuild();
        Some(id)
    }

    pub fn ids(&self) -> &[FrameId] {
        &self.ids
    }

    fn rebuild(&mut self) {
        self.positions.clear();
        for (pos, id) in self.ids.iter().enumerate() {
            self.positions.insert(*id, pos);
        }
    }
}
