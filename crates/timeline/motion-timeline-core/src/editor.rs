//! The recording mutation surface.
//!
//! [`MotionEditor`] pairs a [`MotionTimeline`] with a [`History`] and a
//! cursor. Every mutation applies through the silent timeline layer and
//! records a reversible log entry; undo/redo replays through the silent
//! layer only, so nothing can ever be double-logged.

use crate::changes::ChangeSet;
use crate::config::EditorConfig;
use crate::error::TimelineError;
use crate::frame::MotionFrame;
use crate::handle::{Handle, HandlePoint, HandleSide, HandleType};
use crate::history::{CursorState, EditRecord, History, KeyframeSnapshot};
use crate::ids::FrameId;
use crate::timeline::MotionTimeline;

/// Timeline plus history plus cursor: the surface a UI layer talks to.
#[derive(Debug)]
pub struct MotionEditor {
    timeline: MotionTimeline,
    history: History,
    current_frame: usize,
    end_frame: usize,
}

impl Default for MotionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEditor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            timeline: MotionTimeline::new(),
            history: History::new(config),
            current_frame: 0,
            end_frame: 0,
        }
    }

    /// (Re)load motion data. History is dropped, the cursor resets, and
    /// every frame starts as a keyframe of every field.
    pub fn set_motion_data(
        &mut self,
        frames: Vec<MotionFrame>,
        field_names: Vec<String>,
        frame_rate: f64,
    ) -> Result<(), TimelineError> {
        self.timeline.set_motion_data(frames, field_names, frame_rate)?;
        self.history.clear();
        self.current_frame = 0;
        self.end_frame = self.timeline.frame_count().saturating_sub(1);
        Ok(())
    }

    // ---- queries ----------------------------------------------------------

    #[inline]
    pub fn timeline(&self) -> &MotionTimeline {
        &self.timeline
    }

    pub(crate) fn timeline_mut(&mut self) -> &mut MotionTimeline {
        &mut self.timeline
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.timeline.frame_count()
    }

    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.timeline.frame_rate()
    }

    #[inline]
    pub fn field_names(&self) -> &[String] {
        self.timeline.field_names()
    }

    #[inline]
    pub fn frame_at(&self, pos: usize) -> Option<&MotionFrame> {
        self.timeline.frame_at(pos)
    }

    #[inline]
    pub fn get_value(&self, pos: usize, field: &str) -> Option<f64> {
        self.timeline.get_value(pos, field)
    }

    #[inline]
    pub fn field_series(&self, field: &str) -> Option<Vec<f64>> {
        self.timeline.field_series(field)
    }

    #[inline]
    pub fn field_slice(&self, field: &str, start: usize, len: usize) -> Option<Vec<f64>> {
        self.timeline.field_slice(field, start, len)
    }

    #[inline]
    pub fn is_keyframe(&self, field: &str, pos: usize) -> bool {
        self.timeline.is_keyframe(field, pos)
    }

    #[inline]
    pub fn keyframe_indices(&self, field: &str) -> Vec<usize> {
        self.timeline.keyframe_indices(field)
    }

    #[inline]
    pub fn get_handle(&self, field: &str, pos: usize) -> Option<Handle> {
        self.timeline.get_handle(field, pos)
    }

    #[inline]
    pub fn id_at(&self, pos: usize) -> Option<FrameId> {
        self.timeline.id_at(pos)
    }

    #[inline]
    pub fn pos_of(&self, id: FrameId) -> Option<usize> {
        self.timeline.pos_of(id)
    }

    // ---- cursor -----------------------------------------------------------

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn set_current_frame(&mut self, pos: usize) {
        self.current_frame = pos.min(self.timeline.frame_count().saturating_sub(1));
    }

    #[inline]
    pub fn end_frame(&self) -> usize {
        self.end_frame
    }

    pub fn set_end_frame(&mut self, pos: usize) {
        self.end_frame = pos.min(self.timeline.frame_count().saturating_sub(1));
    }

    fn cursor(&self) -> CursorState {
        CursorState {
            current_frame: self.current_frame,
            end_frame: self.end_frame,
        }
    }

    fn restore_cursor(&mut self, cursor: CursorState) {
        let last = self.timeline.frame_count().saturating_sub(1);
        self.current_frame = cursor.current_frame.min(last);
        self.end_frame = cursor.end_frame.min(last);
    }

    // ---- value edits ------------------------------------------------------

    /// Edit one cell. Consecutive edits inside the coalescing window fold
    /// into a single undo entry keyed by (frame, field).
    pub fn set_frame_field_value(&mut self, pos: usize, field: &str, value: f64) -> ChangeSet {
        let Some(from) = self.timeline.get_value(pos, field) else {
            return ChangeSet::new();
        };
        if from.to_bits() == value.to_bits() {
            return ChangeSet::new();
        }
        self.history
            .note_value_edit(&self.timeline, pos, field, from, value, self.cursor());
        self.timeline.set_value_silently(pos, field, value)
    }

    // ---- structural mutations --------------------------------------------

    /// Insert `frame` at `pos` (`pos == frame_count` appends). Returns the
    /// new frame's id.
    pub fn insert_frame(&mut self, pos: usize, frame: MotionFrame) -> Option<FrameId> {
        self.insert_frame_at(pos, frame, None)
    }

    /// Insert a copy of the cursor frame right after the cursor and move the
    /// cursor onto the copy.
    pub fn duplicate_current_frame(&mut self) -> Option<FrameId> {
        let pos = self.current_frame;
        let frame = self.timeline.frame_at(pos)?.clone();
        self.insert_frame_at(pos + 1, frame, Some(pos + 1))
    }

    fn insert_frame_at(
        &mut self,
        pos: usize,
        frame: MotionFrame,
        cursor_to: Option<usize>,
    ) -> Option<FrameId> {
        let count = self.timeline.frame_count();
        if pos > count || count == 0 {
            return None;
        }
        self.history.commit_pending(&self.timeline);
        let cursor_before = self.cursor();
        let frames_before = self.timeline.clone_frames();
        // appending keeps handle x coordinates at the old last frame in place
        let inclusive = pos < count;
        let id = self
            .timeline
            .insert_frame_silently(pos, frame.clone(), None, inclusive)?;
        if pos <= self.current_frame {
            self.current_frame += 1;
        }
        if pos <= self.end_frame {
            self.end_frame += 1;
        }
        if let Some(c) = cursor_to {
            self.current_frame = c.min(self.timeline.frame_count() - 1);
        }
        self.history.push_record(
            EditRecord::FrameInsert {
                pos,
                id,
                frame,
                inclusive,
                frames_before,
            },
            cursor_before,
            self.cursor(),
        );
        Some(id)
    }

    /// Delete the frame at `pos`. The last remaining frame stays.
    pub fn delete_frame(&mut self, pos: usize) -> bool {
        if pos >= self.timeline.frame_count() || self.timeline.frame_count() <= 1 {
            return false;
        }
        self.history.commit_pending(&self.timeline);
        let cursor_before = self.cursor();
        let tracks_before = self.timeline.clone_tracks();
        let frames_before = self.timeline.clone_frames();
        let Some(removed) = self.timeline.delete_frame_silently(pos) else {
            return false;
        };
        if pos < self.current_frame {
            self.current_frame -= 1;
        }
        if pos < self.end_frame {
            self.end_frame -= 1;
        }
        let last = self.timeline.frame_count().saturating_sub(1);
        self.current_frame = self.current_frame.min(last);
        self.end_frame = self.end_frame.min(last);
        self.history.push_record(
            EditRecord::FrameDelete {
                pos,
                id: removed.id,
                frame: removed.frame,
                tracks_before,
                frames_before,
            },
            cursor_before,
            self.cursor(),
        );
        true
    }

    /// Move the frame at `from` so it lands at `to` in the resulting order.
    /// The cursor follows the moved frame.
    pub fn move_frame(&mut self, from: usize, to: usize) -> bool {
        let count = self.timeline.frame_count();
        if from >= count {
            return false;
        }
        let to = to.min(count - 1);
        if from == to {
            return false;
        }
        let Some(id) = self.timeline.id_at(from) else {
            return false;
        };
        self.history.commit_pending(&self.timeline);
        let cursor_before = self.cursor();
        let tracks_before = self.timeline.clone_tracks();
        let frames_before = self.timeline.clone_frames();
        if !self.timeline.move_frame_silently(from, to) {
            return false;
        }
        if self.current_frame == from {
            self.current_frame = to;
        } else if from < self.current_frame && to >= self.current_frame {
            self.current_frame -= 1;
        } else if from > self.current_frame && to <= self.current_frame {
            self.current_frame += 1;
        }
        self.history.push_record(
            EditRecord::FrameMove {
                from,
                to,
                id,
                tracks_before,
                frames_before,
            },
            cursor_before,
            self.cursor(),
        );
        true
    }

    // ---- keyframe and handle edits ----------------------------------------

    /// Toggle keyframe membership at (`field`, `pos`).
    pub fn toggle_keyframe(&mut self, field: &str, pos: usize) -> ChangeSet {
        if self.timeline.is_keyframe(field, pos) {
            self.remove_keyframe(field, pos)
        } else {
            self.add_keyframe(field, pos)
        }
    }

    pub fn add_keyframe(&mut self, field: &str, pos: usize) -> ChangeSet {
        let (lo, hi) = self.snapshot_span(field, pos);
        self.with_span_record(field, lo, hi, |tl| tl.add_keyframe_silently(field, pos))
    }

    pub fn remove_keyframe(&mut self, field: &str, pos: usize) -> ChangeSet {
        let (lo, hi) = self.snapshot_span(field, pos);
        self.with_span_record(field, lo, hi, |tl| tl.remove_keyframe_silently(field, pos))
    }

    /// Remove several keyframes of `field` at once, re-deriving the
    /// surviving neighbors' handles from the raw data first. Returns the
    /// positions actually removed.
    pub fn smooth_delete_keyframes(&mut self, field: &str, positions: &[usize]) -> Vec<usize> {
        let victims: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|p| self.timeline.is_keyframe(field, *p))
            .collect();
        let (Some(&lo), Some(&hi)) = (victims.iter().min(), victims.iter().max()) else {
            return Vec::new();
        };
        let start = self.timeline.prev_keyframe(field, lo).unwrap_or(lo);
        let end = self.timeline.next_keyframe(field, hi).unwrap_or(hi);
        self.history.commit_pending(&self.timeline);
        let cursor_before = self.cursor();
        let before = KeyframeSnapshot::capture(&self.timeline, field, start, end);
        let removed = self.timeline.smooth_delete_silently(field, &victims);
        if removed.is_empty() {
            return removed;
        }
        let after = before.recapture(&self.timeline);
        self.history.push_record(
            EditRecord::SmoothDelete { before, after },
            cursor_before,
            self.cursor(),
        );
        removed
    }

    /// Switch the handle type at a keyframe; see
    /// [`MotionTimeline::set_handle_type_silently`] for the per-type rules.
    pub fn set_handle_type(&mut self, field: &str, pos: usize, ty: HandleType) -> ChangeSet {
        let (lo, hi) = self.snapshot_span(field, pos);
        self.with_span_record(field, lo, hi, |tl| tl.set_handle_type_silently(field, pos, ty))
    }

    /// Move one handle point, deriving the opposite side where the handle
    /// type requires it.
    pub fn update_handle_point(
        &mut self,
        field: &str,
        pos: usize,
        side: HandleSide,
        point: HandlePoint,
        desired_type: Option<HandleType>,
    ) -> ChangeSet {
        let (lo, hi) = self.snapshot_span(field, pos);
        self.with_span_record(field, lo, hi, |tl| {
            tl.update_handle_point_silently(field, pos, side, point, desired_type)
        })
    }

    /// The span an edit at `pos` can visually affect: the segment(s) between
    /// the surrounding keyframes.
    fn snapshot_span(&self, field: &str, pos: usize) -> (usize, usize) {
        (
            self.timeline.prev_keyframe(field, pos).unwrap_or(pos),
            self.timeline.next_keyframe(field, pos).unwrap_or(pos),
        )
    }

    fn with_span_record<F>(&mut self, field: &str, lo: usize, hi: usize, op: F) -> ChangeSet
    where
        F: FnOnce(&mut MotionTimeline) -> ChangeSet,
    {
        self.history.commit_pending(&self.timeline);
        let cursor_before = self.cursor();
        let before = KeyframeSnapshot::capture(&self.timeline, field, lo, hi);
        let changes = op(&mut self.timeline);
        if changes.is_empty() {
            return changes;
        }
        let after = before.recapture(&self.timeline);
        self.history.push_record(
            EditRecord::KeyframeRange { before, after },
            cursor_before,
            self.cursor(),
        );
        changes
    }

    // ---- undo / redo ------------------------------------------------------

    /// Step the log back one entry, restoring the cursor recorded before the
    /// operation ran. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<ChangeSet> {
        let (changes, cursor) = self.history.undo(&mut self.timeline)?;
        self.restore_cursor(cursor);
        Some(changes)
    }

    /// Step one undone entry forward again.
    pub fn redo(&mut self) -> Option<ChangeSet> {
        let (changes, cursor) = self.history.redo(&mut self.timeline)?;
        self.restore_cursor(cursor);
        Some(changes)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Flush the pending value-edit batch into the log immediately.
    pub fn commit_pending(&mut self) {
        self.history.commit_pending(&self.timeline);
    }
}
