//! Owned timeline state and the silent mutation layer.
//!
//! `MotionTimeline` holds the frame sequence, the id<->position index and the
//! per-field keyframe stores, and implements every mutation *without*
//! recording history. The recording surface ([`crate::editor::MotionEditor`])
//! wraps these; undo/redo replay also goes through this layer, which is what
//! makes double-logging impossible.
//!
//! Consistency contract: every structural mutation leaves the index and all
//! field stores mutually consistent before returning. Out-of-range positions
//! and unknown fields are no-ops, never fatal.

use hashbrown::HashMap;

use crate::changes::ChangeSet;
use crate::curve::{compute_auto_handle, sample_segment, AutoContext};
use crate::error::TimelineError;
use crate::field::FieldTrack;
use crate::frame::MotionFrame;
use crate::handle::{Handle, HandlePoint, HandleSide, HandleType, HANDLE_EPSILON};
use crate::ids::FrameId;
use crate::index::FrameIndex;

/// Everything captured about a deleted frame, enough to reconstruct it
/// identically (same id) on undo.
#[derive(Clone, Debug)]
pub struct RemovedFrame {
    pub id: FrameId,
    pub frame: MotionFrame,
}

/// The per-frame sampled track store.
#[derive(Clone, Debug, Default)]
pub struct MotionTimeline {
    frames: Vec<MotionFrame>,
    field_names: Vec<String>,
    fields: HashMap<String, FieldTrack>,
    index: FrameIndex,
    frame_rate: f64,
}

impl MotionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)initialize from loaded motion data. Every frame becomes a
    /// keyframe for every field; FrameIds are regenerated wholesale.
    pub fn set_motion_data(
        &mut self,
        mut frames: Vec<MotionFrame>,
        field_names: Vec<String>,
        frame_rate: f64,
    ) -> Result<(), TimelineError> {
        if frames.is_empty() {
            return Err(TimelineError::EmptyMotion);
        }
        for frame in &mut frames {
            for field in &field_names {
                if frame.get(field).is_none() {
                    frame.set(field.clone(), 0.0);
                }
            }
        }
        self.frames = frames;
        self.index
            .set_ids((0..self.frames.len()).map(|_| FrameId::new()).collect());
        self.fields = field_names
            .iter()
            .map(|name| (name.clone(), FieldTrack::new()))
            .collect();
        self.field_names = field_names;
        self.frame_rate = frame_rate;
        Ok(())
    }

    // ---- queries ----------------------------------------------------------

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    #[inline]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    #[inline]
    pub fn frame_at(&self, pos: usize) -> Option<&MotionFrame> {
        self.frames.get(pos)
    }

    #[inline]
    pub fn id_at(&self, pos: usize) -> Option<FrameId> {
        self.index.id_at(pos)
    }

    #[inline]
    pub fn pos_of(&self, id: FrameId) -> Option<usize> {
        self.index.pos_of(id)
    }

    /// Raw sampled value at (`pos`, `field`); `None` when either is unknown.
    #[inline]
    pub fn get_value(&self, pos: usize, field: &str) -> Option<f64> {
        self.frames.get(pos).and_then(|f| f.get(field))
    }

    /// Full series of one field, `None` for an undeclared field.
    pub fn field_series(&self, field: &str) -> Option<Vec<f64>> {
        if !self.fields.contains_key(field) {
            return None;
        }
        Some(
            self.frames
                .iter()
                .map(|f| f.get(field).unwrap_or(0.0))
                .collect(),
        )
    }

    /// Bounded-range access without scanning the whole track. The range is
    /// clamped to `[0, frame_count)`.
    pub fn field_slice(&self, field: &str, start: usize, len: usize) -> Option<Vec<f64>> {
        if !self.fields.contains_key(field) {
            return None;
        }
        let start = start.min(self.frames.len());
        let end = start.saturating_add(len).min(self.frames.len());
        Some(
            self.frames[start..end]
                .iter()
                .map(|f| f.get(field).unwrap_or(0.0))
                .collect(),
        )
    }

    pub fn is_keyframe(&self, field: &str, pos: usize) -> bool {
        match (self.fields.get(field), self.index.id_at(pos)) {
            (Some(track), Some(id)) => track.is_keyframe(id),
            _ => false,
        }
    }

    /// Ascending positions of every keyframe of `field`.
    pub fn keyframe_indices(&self, field: &str) -> Vec<usize> {
        let Some(track) = self.fields.get(field) else {
            return Vec::new();
        };
        self.index
            .ids()
            .iter()
            .enumerate()
            .filter(|(_, id)| track.is_keyframe(**id))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Nearest keyframe strictly before `pos`.
    pub fn prev_keyframe(&self, field: &str, pos: usize) -> Option<usize> {
        (0..pos.min(self.frames.len())).rev().find(|p| self.is_keyframe(field, *p))
    }

    /// Nearest keyframe strictly after `pos`.
    pub fn next_keyframe(&self, field: &str, pos: usize) -> Option<usize> {
        ((pos + 1)..self.frames.len()).find(|p| self.is_keyframe(field, *p))
    }

    /// The stored handle at a keyframe, or an auto handle computed on demand
    /// from local neighbors (and not persisted). `None` when `pos` is not a
    /// keyframe of `field`.
    pub fn get_handle(&self, field: &str, pos: usize) -> Option<Handle> {
        if !self.is_keyframe(field, pos) {
            return None;
        }
        let id = self.index.id_at(pos)?;
        if let Some(stored) = self.fields.get(field).and_then(|t| t.stored_handle(id)) {
            return Some(stored.clone());
        }
        Some(compute_auto_handle(
            &self.auto_context(field, pos),
            HandleType::Auto,
        ))
    }

    // ---- curve evaluation -------------------------------------------------

    fn auto_context(&self, field: &str, pos: usize) -> AutoContext {
        let value = self.get_value(pos, field).unwrap_or(0.0);
        let prev_key = self
            .prev_keyframe(field, pos)
            .map(|p| (p, self.get_value(p, field).unwrap_or(0.0)));
        let next_key = self
            .next_keyframe(field, pos)
            .map(|p| (p, self.get_value(p, field).unwrap_or(0.0)));
        let prev_sample = pos.checked_sub(1).and_then(|p| self.get_value(p, field));
        let next_sample = self.get_value(pos + 1, field);
        AutoContext {
            pos,
            value,
            prev_key,
            next_key,
            prev_sample,
            next_sample,
        }
    }

    /// Re-evaluate the cubic Hermite segment between two keyframes, writing
    /// every strictly interior integer position. Segments of length <= 1 are
    /// no-ops.
    pub(crate) fn apply_segment(&mut self, field: &str, start: usize, end: usize) {
        if end <= start + 1 || end >= self.frames.len() {
            return;
        }
        let (Some(v0), Some(v1)) = (self.get_value(start, field), self.get_value(end, field))
        else {
            return;
        };
        let (Some(h0), Some(h1)) = (self.get_handle(field, start), self.get_handle(field, end))
        else {
            return;
        };
        for (pos, value) in sample_segment(start, end, v0, v1, &h0, &h1) {
            self.frames[pos].set(field, value);
        }
    }

    /// Full-field recomputation, required after structural shifts because
    /// every keyframe's neighbor distances changed.
    pub(crate) fn recompute_all_segments_for_field(&mut self, field: &str) {
        let keys = self.keyframe_indices(field);
        log::debug!(
            "recompute field {field}: {} keyframes over {} frames",
            keys.len(),
            self.frames.len()
        );
        for pair in keys.windows(2) {
            self.apply_segment(field, pair[0], pair[1]);
        }
    }

    fn recompute_all_fields(&mut self) {
        let names: Vec<String> = self.field_names.clone();
        for field in &names {
            self.recompute_all_segments_for_field(field);
        }
    }

    /// Re-evaluate the one or two segments touching the keyframe at `pos`.
    /// Returns the touched span for change reporting.
    pub(crate) fn reapply_around(&mut self, field: &str, pos: usize) -> (usize, usize) {
        let prev = self.prev_keyframe(field, pos);
        let next = self.next_keyframe(field, pos);
        if self.is_keyframe(field, pos) {
            if let Some(p) = prev {
                self.apply_segment(field, p, pos);
            }
            if let Some(n) = next {
                self.apply_segment(field, pos, n);
            }
        } else if let (Some(p), Some(n)) = (prev, next) {
            self.apply_segment(field, p, n);
        }
        (prev.unwrap_or(pos), next.unwrap_or(pos))
    }

    /// Batch path: for every listed frame, refresh the *stored* auto handles
    /// of its keyframe neighbors. Each frame is processed independently, so
    /// adjacent entries may recompute the same neighbor more than once; the
    /// final recomputation order is part of the observable behavior and is
    /// kept as is.
    pub(crate) fn recompute_auto_for_frames(&mut self, field: &str, positions: &[usize]) {
        for &pos in positions {
            let neighbors = [
                self.prev_keyframe(field, pos),
                self.next_keyframe(field, pos),
            ];
            for n in neighbors.into_iter().flatten() {
                self.refresh_stored_auto(field, n);
            }
        }
    }

    /// Recompute a stored auto-family handle from current data, preserving
    /// its type. Manual or absent handles are left alone.
    fn refresh_stored_auto(&mut self, field: &str, pos: usize) {
        let Some(id) = self.index.id_at(pos) else {
            return;
        };
        let Some(ty) = self
            .fields
            .get(field)
            .and_then(|t| t.stored_handle(id))
            .map(|h| h.handle_type)
        else {
            return;
        };
        if !ty.is_auto() {
            return;
        }
        let handle = compute_auto_handle(&self.auto_context(field, pos), ty);
        if let Some(track) = self.fields.get_mut(field) {
            track.store_handle(id, handle);
        }
    }

    /// Ensure a keyframe that now bounds a non-trivial segment has a stored
    /// handle: stored auto handles are refreshed, manual ones kept, missing
    /// ones computed and persisted.
    fn pin_boundary_handle(&mut self, field: &str, pos: usize) {
        let Some(id) = self.index.id_at(pos) else {
            return;
        };
        match self
            .fields
            .get(field)
            .and_then(|t| t.stored_handle(id))
            .map(|h| h.handle_type)
        {
            Some(ty) if ty.is_auto() => self.refresh_stored_auto(field, pos),
            Some(_) => {}
            None => {
                let handle = compute_auto_handle(&self.auto_context(field, pos), HandleType::Auto);
                if let Some(track) = self.fields.get_mut(field) {
                    track.store_handle(id, handle);
                }
            }
        }
    }

    // ---- value edits ------------------------------------------------------

    /// Write a new value at (`pos`, `field`) and keep curve data consistent:
    /// a keyframe's stored manual handle follows the value (y shifted by the
    /// delta), stored auto handles are recomputed fresh, neighbor stored auto
    /// handles are refreshed, and the touching segments are re-evaluated.
    pub fn set_value_silently(&mut self, pos: usize, field: &str, value: f64) -> ChangeSet {
        let Some(old) = self.get_value(pos, field) else {
            return ChangeSet::new();
        };
        let delta = value - old;
        self.frames[pos].set(field, value);

        let mut changes = ChangeSet::new();
        if let Some(id) = self.index.id_at(pos).filter(|_| self.is_keyframe(field, pos)) {
            let stored = self
                .fields
                .get(field)
                .and_then(|t| t.stored_handle(id))
                .cloned();
            if let Some(mut handle) = stored {
                if handle.handle_type.is_auto() {
                    self.refresh_stored_auto(field, pos);
                } else {
                    handle.in_point.y += delta;
                    handle.out_point.y += delta;
                    if let Some(track) = self.fields.get_mut(field) {
                        track.store_handle(id, handle);
                    }
                }
            }
            self.recompute_auto_for_frames(field, &[pos]);
            let (start, end) = self.reapply_around(field, pos);
            changes.push(field, start, end);
        } else {
            // Raw touch-up of a non-keyframe sample: neighbors' slope
            // estimates changed, but no segment is re-evaluated (that would
            // immediately overwrite the write).
            self.recompute_auto_for_frames(field, &[pos]);
            changes.push(field, pos, pos);
        }
        changes
    }

    // ---- structural mutations --------------------------------------------

    /// Insert a frame at `pos` (`pos == frame_count` appends). Handle x
    /// coordinates at or above the insertion point shift by +1; with
    /// `inclusive == false` (append-at-end semantics) coordinates exactly at
    /// the insertion point stay put. Returns the id of the new frame.
    pub fn insert_frame_silently(
        &mut self,
        pos: usize,
        mut frame: MotionFrame,
        id: Option<FrameId>,
        inclusive: bool,
    ) -> Option<FrameId> {
        if pos > self.frames.len() || self.frames.is_empty() {
            return None;
        }
        for field in &self.field_names {
            if frame.get(field).is_none() {
                frame.set(field.clone(), 0.0);
            }
        }
        let id = id.unwrap_or_else(FrameId::new);
        self.frames.insert(pos, frame);
        self.index.insert(pos, id);
        self.shift_handles(pos as f64, 1.0, inclusive);
        self.recompute_all_fields();
        Some(id)
    }

    /// Delete the frame at `pos`. Its keyframe/handle entries are purged
    /// from every field first; handle x coordinates above the position shift
    /// by -1. The last remaining frame cannot be deleted (N >= 1).
    pub fn delete_frame_silently(&mut self, pos: usize) -> Option<RemovedFrame> {
        if pos >= self.frames.len() || self.frames.len() <= 1 {
            return None;
        }
        let id = self.index.id_at(pos)?;
        for track in self.fields.values_mut() {
            track.purge(id);
        }
        let frame = self.frames.remove(pos);
        self.index.remove_at(pos);
        self.shift_handles(pos as f64, -1.0, false);
        self.recompute_all_fields();
        Some(RemovedFrame { id, frame })
    }

    /// Move the frame at `from` so it ends up at `to` (a position in the
    /// resulting sequence). Implemented as delete-then-insert preserving the
    /// FrameId; the moved frame's own handles travel with it.
    pub fn move_frame_silently(&mut self, from: usize, to: usize) -> bool {
        let len = self.frames.len();
        if from >= len {
            return false;
        }
        let to = to.min(len - 1);
        if from == to {
            return false;
        }
        let id = match self.index.id_at(from) {
            Some(id) => id,
            None => return false,
        };
        // Detach the moved frame's own handles so the positional shifts
        // below only see everyone else's.
        let mut own: Vec<(String, Handle)> = Vec::new();
        for (name, track) in self.fields.iter_mut() {
            if let Some(h) = track.remove_handle(id) {
                own.push((name.clone(), h));
            }
        }
        let frame = self.frames.remove(from);
        self.index.remove_at(from);
        self.shift_handles(from as f64, -1.0, false);
        self.frames.insert(to, frame);
        self.index.insert(to, id);
        self.shift_handles(to as f64, 1.0, true);
        let delta = to as f64 - from as f64;
        for (name, mut handle) in own {
            handle.in_point.x += delta;
            handle.out_point.x += delta;
            handle.clamp_to_keyframe(to);
            if let Some(track) = self.fields.get_mut(&name) {
                track.store_handle(id, handle);
            }
        }
        self.recompute_all_fields();
        true
    }

    fn shift_handles(&mut self, threshold: f64, delta: f64, inclusive: bool) {
        for track in self.fields.values_mut() {
            for (_, handle) in track.handles_mut() {
                for point in [&mut handle.in_point, &mut handle.out_point] {
                    let shift = if delta > 0.0 {
                        if inclusive {
                            point.x >= threshold
                        } else {
                            point.x > threshold
                        }
                    } else {
                        point.x > threshold
                    };
                    if shift {
                        point.x += delta;
                    }
                }
            }
        }
    }

    // ---- keyframe mutations ----------------------------------------------

    /// Mark `pos` as a keyframe of `field`. The new keyframe gets a stored
    /// auto handle computed from the raw data; boundary keyframes' stored
    /// auto handles are refreshed and the two new segments re-evaluated.
    pub fn add_keyframe_silently(&mut self, field: &str, pos: usize) -> ChangeSet {
        if pos >= self.frames.len()
            || !self.fields.contains_key(field)
            || self.is_keyframe(field, pos)
        {
            return ChangeSet::new();
        }
        let Some(id) = self.index.id_at(pos) else {
            return ChangeSet::new();
        };
        self.set_membership_raw(field, id, true);
        let handle = compute_auto_handle(&self.auto_context(field, pos), HandleType::Auto);
        self.set_handle_entry_raw(field, id, Some(handle));
        self.recompute_auto_for_frames(field, &[pos]);
        let (start, end) = self.reapply_around(field, pos);
        let mut changes = ChangeSet::new();
        changes.push(field, start, end);
        changes
    }

    /// Unmark `pos` as a keyframe of `field`, dropping its stored handle.
    /// The surrounding keyframes get pinned handles (computed from the raw
    /// data before re-evaluation) and the joined segment is re-evaluated.
    pub fn remove_keyframe_silently(&mut self, field: &str, pos: usize) -> ChangeSet {
        if !self.is_keyframe(field, pos) {
            return ChangeSet::new();
        }
        let Some(id) = self.index.id_at(pos) else {
            return ChangeSet::new();
        };
        self.set_membership_raw(field, id, false);
        let prev = self.prev_keyframe(field, pos);
        let next = self.next_keyframe(field, pos);
        for boundary in [prev, next].into_iter().flatten() {
            self.pin_boundary_handle(field, boundary);
        }
        if let (Some(p), Some(n)) = (prev, next) {
            self.apply_segment(field, p, n);
        }
        let mut changes = ChangeSet::new();
        changes.push(field, prev.unwrap_or(pos), next.unwrap_or(pos));
        changes
    }

    /// Remove several keyframes of one field while re-deriving the surviving
    /// neighbors' handles from the raw data first, minimizing visual curve
    /// distortion. Returns the positions actually removed.
    pub fn smooth_delete_silently(&mut self, field: &str, positions: &[usize]) -> Vec<usize> {
        let mut victims: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|p| self.is_keyframe(field, *p))
            .collect();
        victims.sort_unstable();
        victims.dedup();
        if victims.is_empty() {
            return victims;
        }
        for &pos in &victims {
            if let Some(id) = self.index.id_at(pos) {
                self.set_membership_raw(field, id, false);
            }
        }
        let lo = victims[0];
        let hi = victims[victims.len() - 1];
        let start = self.prev_keyframe(field, lo);
        let end = self.next_keyframe(field, hi);
        // Pin every surviving keyframe bounding the rewritten region before
        // any sample is overwritten.
        let mut survivors: Vec<usize> = Vec::new();
        if let Some(s) = start {
            survivors.push(s);
        }
        let scan_from = start.unwrap_or(lo);
        let scan_to = end.unwrap_or(hi);
        survivors.extend(((scan_from + 1)..=scan_to).filter(|p| self.is_keyframe(field, *p)));
        for &pos in &survivors {
            self.pin_boundary_handle(field, pos);
        }
        for pair in survivors.windows(2) {
            self.apply_segment(field, pair[0], pair[1]);
        }
        victims
    }

    // ---- handle mutations -------------------------------------------------

    /// Switch the handle type at a keyframe.
    ///
    /// `Aligned` mirrors the in side from the out side through the keyframe;
    /// `Vector` points both sides a third of the way to the adjacent
    /// keyframes (falling back to pos +/- 1 when a side has no neighbor);
    /// `Auto`/`AutoClamped` discard manual edits and recompute from data.
    pub fn set_handle_type_silently(&mut self, field: &str, pos: usize, ty: HandleType) -> ChangeSet {
        let Some(mut handle) = self.get_handle(field, pos) else {
            return ChangeSet::new();
        };
        let Some(id) = self.index.id_at(pos) else {
            return ChangeSet::new();
        };
        let value = self.get_value(pos, field).unwrap_or(0.0);
        match ty {
            HandleType::Auto | HandleType::AutoClamped => {
                handle = compute_auto_handle(&self.auto_context(field, pos), ty);
            }
            HandleType::Free => {
                handle.handle_type = HandleType::Free;
            }
            HandleType::Aligned => {
                handle.handle_type = HandleType::Aligned;
                handle.mirror_through(pos, value, HandleSide::Out);
            }
            HandleType::Vector => {
                handle.handle_type = HandleType::Vector;
                handle.in_point = self.vector_point(field, pos, value, HandleSide::In);
                handle.out_point = self.vector_point(field, pos, value, HandleSide::Out);
                handle.clamp_to_keyframe(pos);
            }
        }
        self.set_handle_entry_raw(field, id, Some(handle));
        let (start, end) = self.reapply_around(field, pos);
        let mut changes = ChangeSet::new();
        changes.push(field, start, end);
        changes
    }

    /// Move one handle point. The x coordinate is clamped so the point stays
    /// on its own side of the keyframe. Editing an auto handle without an
    /// explicit `desired_type` converts it to `Free`; `Aligned` derives the
    /// opposite side by mirroring, `Vector` re-derives it toward its
    /// neighbor.
    pub fn update_handle_point_silently(
        &mut self,
        field: &str,
        pos: usize,
        side: HandleSide,
        point: HandlePoint,
        desired_type: Option<HandleType>,
    ) -> ChangeSet {
        let Some(mut handle) = self.get_handle(field, pos) else {
            return ChangeSet::new();
        };
        let Some(id) = self.index.id_at(pos) else {
            return ChangeSet::new();
        };
        let value = self.get_value(pos, field).unwrap_or(0.0);
        let ty = desired_type.unwrap_or(if handle.handle_type.is_auto() {
            HandleType::Free
        } else {
            handle.handle_type
        });
        handle.handle_type = ty;
        *handle.point_mut(side) = point;
        handle.clamp_to_keyframe(pos);
        match ty {
            HandleType::Aligned => handle.mirror_through(pos, value, side),
            HandleType::Vector => {
                let opp = crate::handle::opposite(side);
                *handle.point_mut(opp) = self.vector_point(field, pos, value, opp);
                handle.clamp_to_keyframe(pos);
            }
            _ => {}
        }
        self.set_handle_entry_raw(field, id, Some(handle));
        let (start, end) = self.reapply_around(field, pos);
        let mut changes = ChangeSet::new();
        changes.push(field, start, end);
        changes
    }

    /// Control point a third of the way toward the adjacent keyframe (or the
    /// adjacent raw sample at pos +/- 1 when no keyframe neighbor exists).
    fn vector_point(&self, field: &str, pos: usize, value: f64, side: HandleSide) -> HandlePoint {
        let neighbor = match side {
            HandleSide::In => self
                .prev_keyframe(field, pos)
                .map(|p| (p as f64, self.get_value(p, field).unwrap_or(value)))
                .or_else(|| {
                    pos.checked_sub(1)
                        .map(|p| (p as f64, self.get_value(p, field).unwrap_or(value)))
                }),
            HandleSide::Out => self
                .next_keyframe(field, pos)
                .map(|p| (p as f64, self.get_value(p, field).unwrap_or(value)))
                .or(Some((
                    pos as f64 + 1.0,
                    self.get_value(pos + 1, field).unwrap_or(value),
                ))),
        };
        let px = pos as f64;
        match neighbor {
            Some((nx, ny)) => HandlePoint::new(px + (nx - px) / 3.0, value + (ny - value) / 3.0),
            None => match side {
                HandleSide::In => HandlePoint::new(px - HANDLE_EPSILON, value),
                HandleSide::Out => HandlePoint::new(px + HANDLE_EPSILON, value),
            },
        }
    }

    // ---- raw state access for history replay ------------------------------

    pub(crate) fn write_raw(&mut self, pos: usize, field: &str, value: f64) {
        if let Some(frame) = self.frames.get_mut(pos) {
            frame.set(field, value);
        }
    }

    pub(crate) fn set_membership_raw(&mut self, field: &str, id: FrameId, keyframe: bool) {
        if let Some(track) = self.fields.get_mut(field) {
            track.set_keyframe(id, keyframe);
        }
    }

    pub(crate) fn set_handle_entry_raw(&mut self, field: &str, id: FrameId, handle: Option<Handle>) {
        if let Some(track) = self.fields.get_mut(field) {
            match handle {
                Some(h) => track.store_handle(id, h),
                None => {
                    track.remove_handle(id);
                }
            }
        }
    }

    pub(crate) fn stored_handle_entry(&self, field: &str, pos: usize) -> Option<Option<Handle>> {
        let id = self.index.id_at(pos)?;
        self.fields
            .get(field)
            .map(|t| t.stored_handle(id).cloned())
    }

    pub(crate) fn clone_tracks(&self) -> HashMap<String, FieldTrack> {
        self.fields.clone()
    }

    pub(crate) fn clone_frames(&self) -> Vec<MotionFrame> {
        self.frames.clone()
    }

    /// Replace every field's track wholesale. No recompute runs: replay
    /// restores the captured raw samples alongside, and those are
    /// authoritative (a recompute would discard raw non-keyframe touch-ups).
    pub(crate) fn restore_tracks(&mut self, tracks: HashMap<String, FieldTrack>) {
        self.fields = tracks;
    }

    /// Replace the raw sample store wholesale. The snapshot must match the
    /// current frame count; a mismatch means the structural replay it
    /// belongs to was skipped, so the snapshot is dropped too.
    pub(crate) fn restore_frames(&mut self, frames: Vec<MotionFrame>) {
        if frames.len() != self.frames.len() {
            log::warn!(
                "replay: frame snapshot length {} does not match current {}, skipping",
                frames.len(),
                self.frames.len()
            );
            return;
        }
        self.frames = frames;
    }

    pub(crate) fn track(&self, field: &str) -> Option<&FieldTrack> {
        self.fields.get(field)
    }
}
