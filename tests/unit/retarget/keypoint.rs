use super::*;

#[test]
fn duplicates_keep_most_confident() {
    let set = KeypointSet::from_keypoints(&[
        Keypoint::new("nose", 10.0, 10.0, 0.4),
        Keypoint::new("nose", 20.0, 20.0, 0.9),
        Keypoint::new("nose", 30.0, 30.0, 0.6),
        Keypoint::new("left_eye", f32::NAN, 1.0, 1.0),
    ]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("nose").unwrap().x, 20.0);
    assert!(set.confident("nose", 0.5).is_some());
    assert!(set.confident("nose", 0.95).is_none());
}

#[test]
fn metadata_defaults_apply_per_field() {
    let meta: DetectorMetadata =
        serde_json::from_str(r#"{ "width": "wide", "height": 720, "frameRate": 0 }"#).unwrap();
    let resolved = meta.resolve("clip");
    assert_eq!(resolved.dimensions, Dimensions { width: 640, height: 720 });
    assert_eq!(resolved.frame_rate, FrameRate::DEFAULT);
    assert_eq!(resolved.name, "clip");
}

#[test]
fn fps_and_frame_rate_aliases() {
    let a: DetectorMetadata = serde_json::from_str(r#"{ "fps": 24, "name": "walk" }"#).unwrap();
    let b: DetectorMetadata = serde_json::from_str(r#"{ "frameRate": 24 }"#).unwrap();
    assert_eq!(a.fps, Some(24.0));
    assert_eq!(b.fps, Some(24.0));
    assert_eq!(a.resolve("x").name, "walk");
}

#[test]
fn fps_wins_when_both_rate_keys_are_present() {
    let meta: DetectorMetadata =
        serde_json::from_str(r#"{ "fps": 24, "frameRate": 60 }"#).unwrap();
    assert_eq!(meta.fps, Some(24.0));

    let fallback: DetectorMetadata =
        serde_json::from_str(r#"{ "fps": "fast", "frameRate": 60 }"#).unwrap();
    assert_eq!(fallback.fps, Some(60.0));
}

#[test]
fn non_object_metadata_reads_as_defaults() {
    for doc in [
        r#"{ "metadata": null, "detections": [] }"#,
        r#"{ "metadata": "none", "detections": [] }"#,
        r#"{ "metadata": [640, 480], "detections": [] }"#,
    ] {
        let input: DetectorInput = serde_json::from_str(doc).unwrap();
        assert_eq!(input.metadata, DetectorMetadata::default());
        let resolved = input.metadata.resolve("clip");
        assert_eq!(resolved.dimensions, Dimensions::DEFAULT);
        assert_eq!(resolved.frame_rate, FrameRate::DEFAULT);
    }
}

#[test]
fn frames_tolerate_missing_and_malformed_keypoints() {
    let input: DetectorInput = serde_json::from_str(
        r#"{ "detections": [
              { "keypoints": [ {"name": "nose", "x": 1, "y": 2, "confidence": 0.9},
                               {"x": 3} ] },
              { },
              { "keypoints": "garbage" }
           ] }"#,
    )
    .unwrap();
    assert_eq!(input.metadata, DetectorMetadata::default());
    assert_eq!(input.detections.len(), 3);
    assert_eq!(input.detections[0].keypoints.as_ref().unwrap().len(), 1);
    assert!(input.detections[1].keypoints.is_none());
    assert!(input.detections[2].keypoints.is_none());
}

#[test]
fn non_object_detection_entries_read_as_empty_frames() {
    let input: DetectorInput = serde_json::from_str(
        r#"{ "metadata": {}, "detections": [
              null,
              7,
              { "keypoints": [ {"name": "nose", "x": 1, "y": 2, "confidence": 0.9} ] }
           ] }"#,
    )
    .unwrap();
    assert_eq!(input.detections.len(), 3);
    assert_eq!(input.detections[0], DetectionFrame::default());
    assert_eq!(input.detections[1], DetectionFrame::default());
    assert_eq!(input.detections[2].keypoints.as_ref().unwrap().len(), 1);
}

#[test]
fn missing_confidence_reads_as_zero() {
    let kp: Keypoint = serde_json::from_str(r#"{"name": "nose", "x": 1, "y": 2}"#).unwrap();
    assert_eq!(kp.confidence, 0.0);
    assert!(!kp.is_valid(0.5));
}
