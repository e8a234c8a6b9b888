use super::*;
use crate::foundation::core::{Quat, Vec3};

#[test]
fn bare_frames_list_gets_defaults() {
    let anim = import_animation_json(r#"{"frames": []}"#).unwrap();
    assert_eq!(anim.metadata.frame_rate, 30.0);
    assert_eq!(anim.metadata.dimensions, Dimensions::DEFAULT);
    assert_eq!(anim.metadata.duration, 0.0);
    assert_eq!(anim.metadata.frame_count, 0);
    assert_eq!(anim.name(), DEFAULT_IMPORT_NAME);
    assert!(!anim.is_playable());
}

#[test]
fn missing_or_non_list_frames_is_rejected() {
    for doc in [r#"{}"#, r#"{"frames": {}}"#, r#"{"frames": 3}"#, r#"[]"#] {
        let err = import_animation_json(doc).unwrap_err();
        assert!(matches!(err, PoseplayError::Validation(_)), "{doc}: {err}");
    }
    assert!(matches!(
        import_animation_json("not json").unwrap_err(),
        PoseplayError::Serde(_)
    ));
}

#[test]
fn non_positive_frame_rate_is_rejected() {
    let err = import_animation_json(r#"{"metadata": {"frameRate": 0}, "frames": []}"#).unwrap_err();
    assert!(err.to_string().contains("frameRate"));
}

#[test]
fn malformed_frames_and_joints_are_skipped() {
    let anim = import_animation_json(
        r#"{
          "metadata": {"name": "clip", "frameRate": 10, "frameCount": 99, "duration": 5},
          "frames": [
            {"frameIndex": 0, "timestamp": 0, "joints": {
                "Hips": {"position": [0, 1, 0], "rotation": [0, 0, 0, 1]},
                "Head": {"rotation": [1, 2]}
            }},
            "garbage",
            {"joints": {"Spine": {"rotation": [0, 0, 0, 1]}}},
            {"joints": 5}
          ]
        }"#,
    )
    .unwrap();
    assert_eq!(anim.name(), "clip");
    assert_eq!(anim.len(), 2);
    assert_eq!(anim.metadata.frame_count, 2);
    assert!((anim.metadata.duration - 0.2).abs() < 1e-12);
    assert!(!anim.frames[0].pose.contains("Head"));
    assert_eq!(anim.frames[0].pose.position("Hips"), Some(Vec3::Y));
    // derived from its position in the document
    assert_eq!(anim.frames[1].frame_index, 2);
    assert!((anim.frames[1].timestamp - 0.2).abs() < 1e-12);
    anim.validate().unwrap();
}

#[test]
fn export_round_trips_through_import() {
    let mut pose = Pose::new();
    pose.set_rotation("Neck", Quat::from_rotation_x(0.5));
    pose.set_position("Root", Vec3::new(0.1, 0.2, 0.3));
    let anim = Animation::new(
        "one",
        FrameRate::new(24.0).unwrap(),
        Dimensions::new(1280, 720).unwrap(),
        vec![AnimationFrame::at(0, FrameRate::new(24.0).unwrap(), pose)],
    );
    let json = export_animation_json(&anim).unwrap();
    assert!(json.contains("\"frameRate\": 24.0"));
    assert!(json.contains("\"joints\""));
    assert_eq!(import_animation_json(&json).unwrap(), anim);
}

#[test]
fn export_rejects_inconsistent_metadata() {
    let mut anim = Animation::new("x", FrameRate::DEFAULT, Dimensions::DEFAULT, Vec::new());
    anim.metadata.frame_count = 4;
    assert!(export_animation_json(&anim).is_err());
}

#[test]
fn detector_document_requires_detections_list() {
    assert!(matches!(
        parse_detector_json(r#"{"metadata": {}}"#).unwrap_err(),
        PoseplayError::Validation(_)
    ));
    let input = parse_detector_json(
        r#"{"metadata": {"width": 320, "height": 240, "fps": 15},
            "detections": [{"keypoints": [{"name": "nose", "x": 1, "y": 2, "confidence": 0.7}]}]}"#,
    )
    .unwrap();
    assert_eq!(input.detections.len(), 1);
    assert_eq!(input.metadata.fps, Some(15.0));
}
