use motion_timeline_core::{
    HandlePoint, HandleSide, HandleType, MotionEditor, MotionFrame,
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

/// it should keep a frame id resolving to the same logical frame across structural edits
#[test]
fn frame_identity_survives_structural_edits() {
    let mut ed = editor_with(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    let id = ed.id_at(3).unwrap();

    ed.insert_frame(1, frame(&[("j_x", 9.0)])).unwrap();
    assert_eq!(ed.pos_of(id), Some(4));
    assert_eq!(ed.get_value(4, "j_x"), Some(3.0));

    assert!(ed.delete_frame(0));
    assert_eq!(ed.pos_of(id), Some(3));

    assert!(ed.move_frame(3, 0));
    assert_eq!(ed.pos_of(id), Some(0));

    assert!(ed.delete_frame(0));
    assert_eq!(ed.pos_of(id), None);
}

/// it should treat every frame as a keyframe after load
#[test]
fn all_frames_are_keyframes_after_load() {
    let ed = editor_with(&[0.0; 10]);
    for pos in 0..10 {
        assert!(ed.is_keyframe("j_x", pos));
    }
    assert_eq!(ed.keyframe_indices("j_x"), (0..10).collect::<Vec<_>>());
}

/// it should rejoin the surrounding segment when a keyframe is removed
#[test]
fn remove_keyframe_smooths_across_the_gap() {
    let mut ed = editor_with(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0, 6.0, 7.0, 8.0, 9.0]);
    let before = ed.field_series("j_x").unwrap();

    ed.remove_keyframe("j_x", 5);
    assert!(!ed.is_keyframe("j_x", 5));
    assert_eq!(
        ed.keyframe_indices("j_x"),
        vec![0, 1, 2, 3, 4, 6, 7, 8, 9]
    );

    let after = ed.field_series("j_x").unwrap();
    // only the interior of the rejoined segment was rewritten
    for pos in (0..10).filter(|p| *p != 5) {
        assert_eq!(after[pos], before[pos]);
    }
    assert_ne!(after[5], 10.0);
    // hermite of the pinned boundary tangents at the midpoint
    approx::assert_abs_diff_eq!(after[5], 6.25, epsilon = 1e-9);
}

/// it should shift stored handle x coordinates when a frame is inserted
#[test]
fn insert_shifts_manual_handle_x() {
    let mut ed = editor_with(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    ed.update_handle_point(
        "j_x",
        6,
        HandleSide::In,
        HandlePoint::new(5.6, 5.0),
        Some(HandleType::Free),
    );
    assert_eq!(ed.get_handle("j_x", 6).unwrap().in_point.x, 5.6);

    ed.insert_frame(4, frame(&[("j_x", 0.0)])).unwrap();
    assert_eq!(ed.frame_count(), 11);

    let shifted = ed.get_handle("j_x", 7).unwrap();
    assert_eq!(shifted.in_point.x, 6.6);
    assert_eq!(shifted.handle_type, HandleType::Free);
}

/// it should not rewrite any neighbor when all segments are length one
#[test]
fn adjacent_keyframes_leave_neighbors_untouched() {
    let mut ed = editor_with(&[0.0, 1.0, 2.0, 3.0]);
    ed.set_frame_field_value(2, "j_x", 9.0);
    assert_eq!(ed.field_series("j_x").unwrap(), vec![0.0, 1.0, 9.0, 3.0]);
}

/// it should mirror the in handle when an aligned out handle moves
#[test]
fn aligned_handles_stay_mirrored() {
    let mut ed = editor_with(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    ed.set_handle_type("j_x", 3, HandleType::Aligned);
    ed.update_handle_point("j_x", 3, HandleSide::Out, HandlePoint::new(4.0, 5.0), None);

    let h = ed.get_handle("j_x", 3).unwrap();
    assert_eq!(h.out_point, HandlePoint::new(4.0, 5.0));
    // out offset is (1, 2) from the keyframe at (3, 3); in must be (-1, -2)
    assert_eq!(h.in_point, HandlePoint::new(2.0, 1.0));
}

/// it should point vector handles a third of the way to each neighbor
#[test]
fn vector_handles_point_at_neighbors() {
    let mut ed = editor_with(&[0.0, 3.0, 0.0]);
    ed.set_handle_type("j_x", 1, HandleType::Vector);

    let h = ed.get_handle("j_x", 1).unwrap();
    assert_eq!(h.in_point, HandlePoint::new(1.0 + (0.0 - 1.0) / 3.0, 2.0));
    assert_eq!(h.out_point, HandlePoint::new(1.0 + (2.0 - 1.0) / 3.0, 2.0));
}

/// it should ignore out of range positions and unknown fields
#[test]
fn out_of_range_is_a_noop() {
    let mut ed = editor_with(&[0.0, 1.0]);
    assert!(ed.set_frame_field_value(9, "j_x", 1.0).is_empty());
    assert!(ed.set_frame_field_value(0, "nope", 1.0).is_empty());
    assert!(ed.add_keyframe("j_x", 9).is_empty());
    assert!(!ed.delete_frame(9));
    assert!(ed.insert_frame(9, frame(&[("j_x", 0.0)])).is_none());
    assert!(ed.field_series("nope").is_none());
    assert_eq!(ed.frame_count(), 2);
}

/// it should refuse to delete the last remaining frame
#[test]
fn last_frame_cannot_be_deleted() {
    let mut ed = editor_with(&[1.0]);
    assert!(!ed.delete_frame(0));
    assert_eq!(ed.frame_count(), 1);
}

/// it should insert a copy after the cursor and move the cursor onto it
#[test]
fn duplicate_copies_the_cursor_frame() {
    let mut ed = editor_with(&[0.0, 5.0, 2.0]);
    ed.set_current_frame(1);

    let id = ed.duplicate_current_frame().unwrap();
    assert_eq!(ed.frame_count(), 4);
    assert_eq!(ed.current_frame(), 2);
    assert_eq!(ed.pos_of(id), Some(2));
    assert_eq!(ed.get_value(2, "j_x"), Some(5.0));
    assert_eq!(ed.field_series("j_x").unwrap(), vec![0.0, 5.0, 5.0, 2.0]);
}

/// it should fill missing declared fields with zero on load
#[test]
fn missing_fields_default_to_zero() {
    let frames = vec![frame(&[("a", 1.0)]), frame(&[("a", 2.0)])];
    let mut ed = MotionEditor::new();
    ed.set_motion_data(frames, vec!["a".into(), "b".into()], 24.0)
        .unwrap();
    assert_eq!(ed.field_series("b").unwrap(), vec![0.0, 0.0]);
}

/// it should clamp field slices to the frame count
#[test]
fn field_slice_is_clamped() {
    let ed = editor_with(&[0.0, 1.0, 2.0, 3.0]);
    assert_eq!(ed.field_slice("j_x", 2, 10).unwrap(), vec![2.0, 3.0]);
    assert_eq!(ed.field_slice("j_x", 9, 3).unwrap(), Vec::<f64>::new());
}
