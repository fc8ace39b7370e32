use motion_timeline_core::{
    export_baked, export_baked_json, export_project_json, load_project, parse_motion_project_json,
    HandlePoint, HandleSide, HandleType, MotionEditor, MotionFrame, MotionProject, ProjectTrack,
    TimelineError,
};

fn frame(fields: &[(&str, f64)]) -> MotionFrame {
    fields.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn editor_with(values: &[f64]) -> MotionEditor {
    let frames = values.iter().map(|v| frame(&[("j_x", *v)])).collect();
    let mut ed = MotionEditor::new();
    ed.set_motion_data(frames, vec!["j_x".into()], 30.0).unwrap();
    ed
}

/// it should dump raw values only, with no handle metadata
#[test]
fn baked_export_contains_values_only() {
    let ed = editor_with(&[0.0, 1.0, 4.0]);
    let baked = export_baked(ed.timeline());
    assert_eq!(baked.frame_rate, 30.0);
    assert_eq!(baked.tracks.len(), 1);
    assert_eq!(baked.tracks[0].field, "j_x");
    assert_eq!(baked.tracks[0].values, vec![0.0, 1.0, 4.0]);

    let json = export_baked_json(ed.timeline()).unwrap();
    assert!(!json.contains("handles"));
    assert!(!json.contains("ignored"));
}

/// it should round-trip keyframe membership and handles through json
#[test]
fn project_roundtrip_preserves_metadata() {
    let mut ed = editor_with(&[0.0, 2.0, 4.0, 6.0, 8.0]);
    ed.remove_keyframe("j_x", 2);
    ed.update_handle_point(
        "j_x",
        1,
        HandleSide::Out,
        HandlePoint::new(1.8, 3.0),
        Some(HandleType::Free),
    );

    let json = export_project_json(ed.timeline()).unwrap();
    let project = parse_motion_project_json(&json).unwrap();

    let mut loaded = MotionEditor::new();
    load_project(&mut loaded, &project).unwrap();

    assert_eq!(loaded.frame_count(), 5);
    assert_eq!(loaded.frame_rate(), 30.0);
    assert_eq!(loaded.field_series("j_x"), ed.field_series("j_x"));
    assert!(!loaded.is_keyframe("j_x", 2));

    let h = loaded.get_handle("j_x", 1).unwrap();
    assert_eq!(h.handle_type, HandleType::Free);
    assert_eq!(h.out_point, HandlePoint::new(1.8, 3.0));

    assert!(!loaded.can_undo());
}

/// it should mint fresh frame ids on every load
#[test]
fn load_regenerates_ids() {
    let mut ed = editor_with(&[0.0, 1.0]);
    let old = ed.id_at(0).unwrap();

    let json = export_project_json(ed.timeline()).unwrap();
    let project = parse_motion_project_json(&json).unwrap();
    load_project(&mut ed, &project).unwrap();

    assert_ne!(ed.id_at(0).unwrap(), old);
}

/// it should reject empty motion data
#[test]
fn empty_motion_is_rejected() {
    let mut ed = MotionEditor::new();
    let err = ed
        .set_motion_data(Vec::new(), vec!["j_x".into()], 30.0)
        .unwrap_err();
    assert_eq!(err, TimelineError::EmptyMotion);
}

/// it should reject a project track for an undeclared field
#[test]
fn unknown_project_field_is_rejected() {
    let project = MotionProject {
        frame_rate: 30.0,
        field_names: vec!["j_x".into()],
        frames: vec![frame(&[("j_x", 0.0)])],
        tracks: vec![ProjectTrack {
            field: "j_y".into(),
            ignored_positions: Vec::new(),
            handles: Vec::new(),
        }],
    };
    let mut ed = MotionEditor::new();
    match load_project(&mut ed, &project) {
        Err(TimelineError::UnknownField { field }) => assert_eq!(field, "j_y"),
        other => panic!("unexpected result: {other:?}"),
    }
}
