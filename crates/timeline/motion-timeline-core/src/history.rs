//! The reversible operation log.
//!
//! Every committed operation becomes a [`LogEntry`] carrying enough before
//! and after state to replay in either direction exactly, plus the cursor to
//! restore. Value edits pass through a pending batch first: consecutive
//! edits of the same (frame, field) cell inside the coalescing window fold
//! into one entry, keeping a mouse drag from producing an entry per tick.
//!
//! Replay writes through the raw/silent [`MotionTimeline`] layer only, so a
//! replayed operation can never record itself. A cell whose frame id no
//! longer resolves is skipped with a warning rather than failing the whole
//! replay; per-field state stays consistent either way.

use hashbrown::HashMap;
use instant::Instant;

use crate::changes::ChangeSet;
use crate::config::EditorConfig;
use crate::field::FieldTrack;
use crate::frame::MotionFrame;
use crate::handle::Handle;
use crate::ids::FrameId;
use crate::timeline::MotionTimeline;

/// Cursor positions captured with every log entry and restored on replay.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CursorState {
    pub current_frame: usize,
    pub end_frame: usize,
}

/// One coalesced value edit: the first observed `from` and the latest `to`
/// for a (frame, field) cell within the batching window.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueCell {
    pub id: FrameId,
    pub field: String,
    pub from: f64,
    pub to: f64,
}

/// Captured state of one frame within a field: raw value, keyframe
/// membership, and the stored handle entry (`None` when nothing is stored).
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotEntry {
    pub id: FrameId,
    pub value: f64,
    pub keyframe: bool,
    pub handle: Option<Handle>,
}

/// Per-field snapshot of the minimal span an operation can affect: the
/// segment(s) between the keyframes surrounding the edit, interiors
/// included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeSnapshot {
    pub field: String,
    pub entries: Vec<SnapshotEntry>,
}

impl KeyframeSnapshot {
    pub(crate) fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            entries: Vec::new(),
        }
    }

    /// Capture positions `[lo, hi]` of `field`, clamped to the frame count.
    pub(crate) fn capture(timeline: &MotionTimeline, field: &str, lo: usize, hi: usize) -> Self {
        let mut snap = Self::new(field);
        snap.extend_capture(timeline, lo, hi);
        snap
    }

    /// Add any not-yet-captured cells of `[lo, hi]`. The first capture of a
    /// cell wins, so a growing batch keeps the oldest observed state.
    pub(crate) fn extend_capture(&mut self, timeline: &MotionTimeline, lo: usize, hi: usize) {
        let last = timeline.frame_count().saturating_sub(1);
        for pos in lo..=hi.min(last) {
            let Some(id) = timeline.id_at(pos) else {
                continue;
            };
            if self.entries.iter().any(|e| e.id == id) {
                continue;
            }
            self.entries.push(SnapshotEntry {
                id,
                value: timeline.get_value(pos, &self.field).unwrap_or(0.0),
                keyframe: timeline.is_keyframe(&self.field, pos),
                handle: timeline.stored_handle_entry(&self.field, pos).flatten(),
            });
        }
    }

    /// Re-capture the same cells from the current state (the "after" side of
    /// a record).
    pub(crate) fn recapture(&self, timeline: &MotionTimeline) -> Self {
        let mut snap = Self::new(&self.field);
        for entry in &self.entries {
            let Some(pos) = timeline.pos_of(entry.id) else {
                continue;
            };
            snap.entries.push(SnapshotEntry {
                id: entry.id,
                value: timeline.get_value(pos, &self.field).unwrap_or(0.0),
                keyframe: timeline.is_keyframe(&self.field, pos),
                handle: timeline.stored_handle_entry(&self.field, pos).flatten(),
            });
        }
        snap
    }

    /// Write the captured cells back through the raw layer. Cells whose
    /// frame no longer exists are skipped; replay never fails.
    pub(crate) fn apply(&self, timeline: &mut MotionTimeline) -> ChangeSet {
        let mut touched: Option<(usize, usize)> = None;
        for entry in &self.entries {
            let Some(pos) = timeline.pos_of(entry.id) else {
                log::warn!(
                    "replay: frame {} of field {} no longer exists, skipping",
                    entry.id,
                    self.field
                );
                continue;
            };
            timeline.write_raw(pos, &self.field, entry.value);
            timeline.set_membership_raw(&self.field, entry.id, entry.keyframe);
            timeline.set_handle_entry_raw(&self.field, entry.id, entry.handle.clone());
            touched = Some(match touched {
                Some((lo, hi)) => (lo.min(pos), hi.max(pos)),
                None => (pos, pos),
            });
        }
        let mut changes = ChangeSet::new();
        if let Some((lo, hi)) = touched {
            changes.push(self.field.clone(), lo, hi);
        }
        changes
    }
}

/// A reversible operation record. Snapshot-backed kinds restore captured
/// state wholesale; structural kinds replay the inverse structural op and
/// then restore the captured tracks and raw samples, since the replay's own
/// recompute rederives interiors and would lose raw touch-ups.
#[derive(Clone, Debug)]
pub enum EditRecord {
    /// Coalesced value edits plus before/after snapshots of every span the
    /// edits could have rewritten (stored handles and interpolated interior
    /// samples included).
    ValueBatch {
        cells: Vec<ValueCell>,
        before: Vec<KeyframeSnapshot>,
        after: Vec<KeyframeSnapshot>,
    },
    /// A frame inserted at `pos` (frame copy / duplication).
    FrameInsert {
        pos: usize,
        id: FrameId,
        frame: MotionFrame,
        inclusive: bool,
        frames_before: Vec<MotionFrame>,
    },
    /// A frame deleted from `pos`, with every field's keyframe/handle state
    /// and every raw sample as they stood just before the delete.
    FrameDelete {
        pos: usize,
        id: FrameId,
        frame: MotionFrame,
        tracks_before: HashMap<String, FieldTrack>,
        frames_before: Vec<MotionFrame>,
    },
    /// A frame moved from `from` to `to`, keeping its id.
    FrameMove {
        from: usize,
        to: usize,
        id: FrameId,
        tracks_before: HashMap<String, FieldTrack>,
        frames_before: Vec<MotionFrame>,
    },
    /// Keyframe membership or handle change over one field's touched span.
    KeyframeRange {
        before: KeyframeSnapshot,
        after: KeyframeSnapshot,
    },
    /// Batched keyframe removal with neighbor handle re-derivation.
    SmoothDelete {
        before: KeyframeSnapshot,
        after: KeyframeSnapshot,
    },
}

impl EditRecord {
    fn apply_backward(&self, timeline: &mut MotionTimeline) -> ChangeSet {
        match self {
            EditRecord::ValueBatch { before, .. } => {
                let mut changes = ChangeSet::new();
                for snap in before {
                    changes.merge(snap.apply(timeline));
                }
                changes
            }
            EditRecord::FrameInsert {
                id, frames_before, ..
            } => match timeline.pos_of(*id) {
                Some(pos) => {
                    timeline.delete_frame_silently(pos);
                    timeline.restore_frames(frames_before.clone());
                    ChangeSet::structural()
                }
                None => {
                    log::warn!("undo insert: frame {id} no longer exists, skipping");
                    ChangeSet::new()
                }
            },
            EditRecord::FrameDelete {
                pos,
                id,
                frame,
                tracks_before,
                frames_before,
            } => {
                if timeline
                    .insert_frame_silently(*pos, frame.clone(), Some(*id), true)
                    .is_some()
                {
                    timeline.restore_tracks(tracks_before.clone());
                    timeline.restore_frames(frames_before.clone());
                    ChangeSet::structural()
                } else {
                    log::warn!("undo delete: cannot reinsert frame {id} at {pos}, skipping");
                    ChangeSet::new()
                }
            }
            EditRecord::FrameMove {
                from,
                id,
                tracks_before,
                frames_before,
                ..
            } => match timeline.pos_of(*id) {
                Some(cur) => {
                    timeline.move_frame_silently(cur, *from);
                    timeline.restore_tracks(tracks_before.clone());
                    timeline.restore_frames(frames_before.clone());
                    ChangeSet::structural()
                }
                None => {
                    log::warn!("undo move: frame {id} no longer exists, skipping");
                    ChangeSet::new()
                }
            },
            EditRecord::KeyframeRange { before, .. } | EditRecord::SmoothDelete { before, .. } => {
                before.apply(timeline)
            }
        }
    }

    fn apply_forward(&self, timeline: &mut MotionTimeline) -> ChangeSet {
        match self {
            EditRecord::ValueBatch { after, .. } => {
                let mut changes = ChangeSet::new();
                for snap in after {
                    changes.merge(snap.apply(timeline));
                }
                changes
            }
            EditRecord::FrameInsert {
                pos,
                id,
                frame,
                inclusive,
                ..
            } => {
                if timeline
                    .insert_frame_silently(*pos, frame.clone(), Some(*id), *inclusive)
                    .is_some()
                {
                    ChangeSet::structural()
                } else {
                    log::warn!("redo insert: position {pos} is out of range, skipping");
                    ChangeSet::new()
                }
            }
            EditRecord::FrameDelete { id, .. } => match timeline.pos_of(*id) {
                Some(pos) => {
                    timeline.delete_frame_silently(pos);
                    ChangeSet::structural()
                }
                None => {
                    log::warn!("redo delete: frame {id} no longer exists, skipping");
                    ChangeSet::new()
                }
            },
            EditRecord::FrameMove { to, id, .. } => match timeline.pos_of(*id) {
                Some(cur) => {
                    timeline.move_frame_silently(cur, *to);
                    ChangeSet::structural()
                }
                None => {
                    log::warn!("redo move: frame {id} no longer exists, skipping");
                    ChangeSet::new()
                }
            },
            EditRecord::KeyframeRange { after, .. } | EditRecord::SmoothDelete { after, .. } => {
                after.apply(timeline)
            }
        }
    }
}

/// One committed log entry: the record plus the cursor to restore for each
/// replay direction.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub record: EditRecord,
    pub cursor_before: CursorState,
    pub cursor_after: CursorState,
}

/// A value-edit batch still inside its coalescing window.
#[derive(Clone, Debug)]
struct PendingBatch {
    cells: Vec<ValueCell>,
    before: Vec<KeyframeSnapshot>,
    cursor_before: CursorState,
    cursor_last: CursorState,
    last_edit: Instant,
}

/// Undo and redo stacks plus the pending value-edit batch.
#[derive(Debug)]
pub struct History {
    undo: Vec<LogEntry>,
    redo: Vec<LogEntry>,
    pending: Option<PendingBatch>,
    config: EditorConfig,
}

impl History {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            pending: None,
            config,
        }
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || !self.undo.is_empty()
    }

    /// False while a pending batch exists: committing it would clear the
    /// redo stack, so there is nothing a `redo` call could reapply.
    #[inline]
    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && !self.redo.is_empty()
    }

    /// Committed undoable entries plus the pending batch, if any.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo.len() + usize::from(self.pending.is_some())
    }

    #[inline]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Committed entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.undo
    }

    /// Drop everything (full reload).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.pending = None;
    }

    /// Fold one value edit into the pending batch, starting a fresh batch
    /// when the idle window has lapsed. Must be called with the timeline
    /// state *before* the edit is applied, so the first touch of a cell
    /// captures its pre-edit span.
    pub(crate) fn note_value_edit(
        &mut self,
        timeline: &MotionTimeline,
        pos: usize,
        field: &str,
        from: f64,
        to: f64,
        cursor: CursorState,
    ) {
        if self.window_lapsed() {
            self.commit_pending(timeline);
        }
        let Some(id) = timeline.id_at(pos) else {
            return;
        };
        let lo = timeline.prev_keyframe(field, pos).unwrap_or(pos);
        let hi = timeline.next_keyframe(field, pos).unwrap_or(pos);
        let pending = self.pending.get_or_insert_with(|| PendingBatch {
            cells: Vec::new(),
            before: Vec::new(),
            cursor_before: cursor,
            cursor_last: cursor,
            last_edit: Instant::now(),
        });
        match pending
            .cells
            .iter_mut()
            .find(|c| c.id == id && c.field == field)
        {
            Some(cell) => cell.to = to,
            None => pending.cells.push(ValueCell {
                id,
                field: field.to_string(),
                from,
                to,
            }),
        }
        if !pending.before.iter().any(|s| s.field == field) {
            pending.before.push(KeyframeSnapshot::new(field));
        }
        if let Some(snap) = pending.before.iter_mut().find(|s| s.field == field) {
            snap.extend_capture(timeline, lo, hi);
        }
        pending.cursor_last = cursor;
        pending.last_edit = Instant::now();
    }

    fn window_lapsed(&self) -> bool {
        self.pending
            .as_ref()
            .map(|p| p.last_edit.elapsed().as_millis() as u64 >= self.config.coalesce_window_ms)
            .unwrap_or(false)
    }

    /// Commit the pending batch, if any. Called on window expiry and before
    /// any structural mutation or undo/redo, so a batch never straddles
    /// unrelated operations.
    pub fn commit_pending(&mut self, timeline: &MotionTimeline) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.cells.is_empty() {
            return;
        }
        let after = pending
            .before
            .iter()
            .map(|snap| snap.recapture(timeline))
            .collect();
        self.push_entry(LogEntry {
            record: EditRecord::ValueBatch {
                cells: pending.cells,
                before: pending.before,
                after,
            },
            cursor_before: pending.cursor_before,
            cursor_after: pending.cursor_last,
        });
    }

    /// Record a committed operation. Clears the redo stack and evicts the
    /// oldest entries past the configured depth.
    pub(crate) fn push_record(
        &mut self,
        record: EditRecord,
        cursor_before: CursorState,
        cursor_after: CursorState,
    ) {
        self.push_entry(LogEntry {
            record,
            cursor_before,
            cursor_after,
        });
    }

    fn push_entry(&mut self, entry: LogEntry) {
        self.redo.clear();
        self.undo.push(entry);
        if self.undo.len() > self.config.max_undo_depth {
            let overflow = self.undo.len() - self.config.max_undo_depth;
            self.undo.drain(..overflow);
        }
    }

    /// Step one entry back. Returns the touched ranges and the cursor state
    /// recorded before the operation originally ran.
    pub fn undo(&mut self, timeline: &mut MotionTimeline) -> Option<(ChangeSet, CursorState)> {
        self.commit_pending(timeline);
        let entry = self.undo.pop()?;
        let changes = entry.record.apply_backward(timeline);
        let cursor = entry.cursor_before;
        self.redo.push(entry);
        Some((changes, cursor))
    }

    /// Step one undone entry forward again. A value edit between undo and
    /// redo clears the redo stack first, per the linear-history invariant.
    pub fn redo(&mut self, timeline: &mut MotionTimeline) -> Option<(ChangeSet, CursorState)> {
        self.commit_pending(timeline);
        let entry = self.redo.pop()?;
        let changes = entry.record.apply_forward(timeline);
        let cursor = entry.cursor_after;
        self.undo.push(entry);
        Some((changes, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(n: usize) -> MotionTimeline {
        let frames: Vec<MotionFrame> = (0..n)
            .map(|i| [("j".to_string(), i as f64)].into_iter().collect())
            .collect();
        let mut tl = MotionTimeline::new();
        tl.set_motion_data(frames, vec!["j".into()], 30.0).unwrap();
        tl
    }

    fn cursor() -> CursorState {
        CursorState {
            current_frame: 0,
            end_frame: 0,
        }
    }

    /// it should merge repeated edits of one cell into a single record
    #[test]
    fn pending_batch_merges_cells() {
        let tl = timeline(3);
        let mut h = History::new(EditorConfig::default());
        h.note_value_edit(&tl, 1, "j", 1.0, 4.0, cursor());
        h.note_value_edit(&tl, 1, "j", 4.0, 8.0, cursor());
        h.commit_pending(&tl);
        assert_eq!(h.entries().len(), 1);
        match &h.entries()[0].record {
            EditRecord::ValueBatch { cells, .. } => {
                assert_eq!(cells.len(), 1);
                assert_eq!(cells[0].from, 1.0);
                assert_eq!(cells[0].to, 8.0);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    /// it should skip cells whose frame no longer exists during replay
    #[test]
    fn replay_skips_missing_frames() {
        let mut tl = timeline(4);
        let mut h = History::new(EditorConfig::default());
        h.note_value_edit(&tl, 2, "j", 2.0, 9.0, cursor());
        tl.set_value_silently(2, "j", 9.0);
        h.commit_pending(&tl);
        // independent, unrecorded deletion invalidates the batch's frame id
        tl.delete_frame_silently(2);
        assert!(h.undo(&mut tl).is_some());
        assert_eq!(tl.frame_count(), 3);
        assert_eq!(tl.get_value(1, "j"), Some(1.0));
        assert_eq!(tl.get_value(2, "j"), Some(3.0));
    }

    /// it should commit an empty pending batch as nothing
    #[test]
    fn empty_pending_commits_nothing() {
        let tl = timeline(2);
        let mut h = History::new(EditorConfig::default());
        h.commit_pending(&tl);
        assert!(!h.can_undo());
    }
}
