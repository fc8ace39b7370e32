//! Serialized motion formats.
//!
//! Two dumps with different purposes: [`BakedMotion`] carries curve-baked
//! raw values only (for standard interchange formats), while
//! [`MotionProject`] round-trips the full editing state including keyframe
//! membership and stored handles. Project tracks reference frame
//! *positions*, never ids: FrameIds are minted fresh on every load.

use serde::{Deserialize, Serialize};

use crate::editor::MotionEditor;
use crate::error::TimelineError;
use crate::frame::MotionFrame;
use crate::handle::Handle;
use crate::timeline::MotionTimeline;

/// Curve-baked export: raw per-frame values, no handle metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedMotion {
    pub frame_rate: f64,
    pub tracks: Vec<BakedTrack>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedTrack {
    pub field: String,
    pub values: Vec<f64>,
}

pub fn export_baked(timeline: &MotionTimeline) -> BakedMotion {
    BakedMotion {
        frame_rate: timeline.frame_rate(),
        tracks: timeline
            .field_names()
            .iter()
            .map(|field| BakedTrack {
                field: field.clone(),
                values: timeline.field_series(field).unwrap_or_default(),
            })
            .collect(),
    }
}

pub fn export_baked_json(timeline: &MotionTimeline) -> Result<String, TimelineError> {
    Ok(serde_json::to_string(&export_baked(timeline))?)
}

/// Full project dump for a save/load round-trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionProject {
    pub frame_rate: f64,
    pub field_names: Vec<String>,
    pub frames: Vec<MotionFrame>,
    pub tracks: Vec<ProjectTrack>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectTrack {
    pub field: String,
    /// Positions that are NOT keyframes (the inverted sparse model).
    #[serde(default)]
    pub ignored_positions: Vec<usize>,
    #[serde(default)]
    pub handles: Vec<ProjectHandle>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectHandle {
    pub position: usize,
    #[serde(flatten)]
    pub handle: Handle,
}

pub fn export_project(timeline: &MotionTimeline) -> MotionProject {
    let frames = (0..timeline.frame_count())
        .filter_map(|p| timeline.frame_at(p).cloned())
        .collect();
    let tracks = timeline
        .field_names()
        .iter()
        .map(|field| {
            let mut ignored_positions: Vec<usize> = Vec::new();
            let mut handles: Vec<ProjectHandle> = Vec::new();
            if let Some(track) = timeline.track(field) {
                ignored_positions = track
                    .ignored()
                    .filter_map(|id| timeline.pos_of(id))
                    .collect();
                ignored_positions.sort_unstable();
                handles = track
                    .handles()
                    .filter_map(|(id, h)| {
                        timeline.pos_of(id).map(|position| ProjectHandle {
                            position,
                            handle: h.clone(),
                        })
                    })
                    .collect();
                handles.sort_unstable_by_key(|h| h.position);
            }
            ProjectTrack {
                field: field.clone(),
                ignored_positions,
                handles,
            }
        })
        .collect();
    MotionProject {
        frame_rate: timeline.frame_rate(),
        field_names: timeline.field_names().to_vec(),
        frames,
        tracks,
    }
}

pub fn export_project_json(timeline: &MotionTimeline) -> Result<String, TimelineError> {
    Ok(serde_json::to_string(&export_project(timeline))?)
}

pub fn parse_motion_project_json(json: &str) -> Result<MotionProject, TimelineError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a parsed project into `editor`: frames and field set first, then
/// keyframe membership and stored handles through the raw layer. The baked
/// values in the project are already curve-consistent, so nothing is
/// recomputed. History is reset.
pub fn load_project(editor: &mut MotionEditor, project: &MotionProject) -> Result<(), TimelineError> {
    for track in &project.tracks {
        if !project.field_names.contains(&track.field) {
            return Err(TimelineError::UnknownField {
                field: track.field.clone(),
            });
        }
    }
    editor.set_motion_data(
        project.frames.clone(),
        project.field_names.clone(),
        project.frame_rate,
    )?;
    let timeline = editor.timeline_mut();
    for track in &project.tracks {
        for &pos in &track.ignored_positions {
            if let Some(id) = timeline.id_at(pos) {
                timeline.set_membership_raw(&track.field, id, false);
            }
        }
        for ph in &track.handles {
            if let Some(id) = timeline.id_at(ph.position) {
                timeline.set_handle_entry_raw(&track.field, id, Some(ph.handle.clone()));
            }
        }
    }
    Ok(())
}

/// Parse and load in one step.
pub fn load_project_json(editor: &mut MotionEditor, json: &str) -> Result<(), TimelineError> {
    let project = parse_motion_project_json(json)?;
    load_project(editor, &project)
}
