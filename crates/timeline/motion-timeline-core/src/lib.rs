//! Motion Timeline Core (UI-agnostic)
//!
//! Keyframe and curve engine for per-frame numeric motion tracks (robot
//! joint angles, skeletal bone rotations) with a command-log undo/redo
//! system. The data model is deliberately inverted-sparse: every frame is a
//! keyframe of every field until explicitly toggled off. Keyframes carry
//! Bezier-style tangent handles; the samples between two keyframes are
//! driven by cubic Hermite evaluation of the handle slopes.
//!
//! [`editor::MotionEditor`] is the surface a UI layer talks to: it applies
//! every mutation through the silent [`timeline::MotionTimeline`] layer and
//! records reversible entries in [`history::History`]. Rendering, playback
//! scheduling and kinematics live in other crates; this one only hands out
//! sampled values and changed ranges.

pub mod changes;
pub mod config;
pub mod curve;
pub mod editor;
pub mod error;
pub mod field;
pub mod frame;
pub mod handle;
pub mod history;
pub mod ids;
pub mod index;
pub mod project;
pub mod timeline;

// Re-exports for consumers (UI adapters, exporters)
pub use changes::{ChangeSet, ChangedSpan};
pub use config::EditorConfig;
pub use editor::MotionEditor;
pub use error::TimelineError;
pub use field::FieldTrack;
pub use frame::MotionFrame;
pub use handle::{Handle, HandlePoint, HandleSide, HandleType, HANDLE_EPSILON};
pub use history::{
    CursorState, EditRecord, History, KeyframeSnapshot, LogEntry, SnapshotEntry, ValueCell,
};
pub use ids::FrameId;
pub use index::FrameIndex;
pub use project::{
    export_baked, export_baked_json, export_project, export_project_json, load_project,
    load_project_json, parse_motion_project_json, BakedMotion, BakedTrack, MotionProject,
    ProjectHandle, ProjectTrack,
};
pub use timeline::{MotionTimeline, RemovedFrame};
