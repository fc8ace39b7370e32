//! Per-field sparse keyframe metadata.
//!
//! The sparse model is inverted on purpose: `ignored_frames` lists the
//! frames that are NOT keyframes, so a freshly loaded track has every frame
//! as a keyframe until one is explicitly toggled off. Handle entries exist
//! only for non-default (manual) or explicitly computed handles; anything
//! else is derived on demand from neighboring data.

use hashbrown::{HashMap, HashSet};

use crate::handle::Handle;
use crate::ids::FrameId;

/// Keyframe membership and stored handles for one named track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldTrack {
    ignored_frames: HashSet<FrameId>,
    handles: HashMap<FrameId, Handle>,
}

impl FieldTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame is a keyframe unless it was explicitly toggled off.
    #[inline]
    pub fn is_keyframe(&self, id: FrameId) -> bool {
        !self.ignored_frames.contains(&id)
    }

    /// Mark or unmark `id` as a keyframe. Unmarking drops any stored handle.
    pub fn set_keyframe(&mut self, id: FrameId, on: bool) {
        if on {
            self.ignored_frames.remove(&id);
        } else {
            self.ignored_frames.insert(id);
            self.handles.remove(&id);
        }
    }

    #[inline]
    pub fn stored_handle(&self, id: FrameId) -> Option<&Handle> {
        self.handles.get(&id)
    }

    #[inline]
    pub fn store_handle(&mut self, id: FrameId, handle: Handle) {
        self.handles.insert(id, handle);
    }

    #[inline]
    pub fn remove_handle(&mut self, id: FrameId) -> Option<Handle> {
        self.handles.remove(&id)
    }

    /// Drop every trace of `id` (frame deleted).
    pub fn purge(&mut self, id: FrameId) {
        self.ignored_frames.remove(&id);
        self.handles.remove(&id);
    }

    pub fn handles(&self) -> impl Iterator<Item = (FrameId, &Handle)> {
        self.handles.iter().map(|(id, h)| (*id, h))
    }

    pub fn handles_mut(&mut self) -> impl Iterator<Item = (FrameId, &mut Handle)> {
        self.handles.iter_mut().map(|(id, h)| (*id, h))
    }

    pub fn ignored(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.ignored_frames.iter().copied()
    }
}
