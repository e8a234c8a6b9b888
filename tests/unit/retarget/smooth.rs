use super::*;

fn frame(x: f32, confidence: f32) -> KeypointSet {
    KeypointSet::from_keypoints(&[Keypoint::new("nose", x, 100.0, confidence)])
}

#[test]
fn first_frame_passes_through() {
    let mut s = KeypointSmoother::new(5);
    let out = s.smooth(&frame(10.0, 0.9));
    assert_eq!(out.get("nose").unwrap().x, 10.0);
    assert_eq!(out.get("nose").unwrap().y, 100.0);
}

#[test]
fn recent_frames_weigh_more() {
    let mut s = KeypointSmoother::new(5);
    s.smooth(&frame(0.0, 1.0));
    let out = s.smooth(&frame(30.0, 1.0));
    // weights 1 and 2
    assert!((out.get("nose").unwrap().x - 20.0).abs() < 1e-4);
}

#[test]
fn confidence_scales_weight_and_is_not_smoothed() {
    let mut s = KeypointSmoother::new(5);
    s.smooth(&frame(0.0, 1.0));
    let out = s.smooth(&frame(30.0, 0.25));
    // weights 1.0 and 0.5
    let kp = out.get("nose").unwrap();
    assert!((kp.x - 10.0).abs() < 1e-4);
    assert_eq!(kp.confidence, 0.25);
}

#[test]
fn window_bounds_history() {
    let mut s = KeypointSmoother::new(2);
    s.smooth(&frame(1000.0, 1.0));
    s.smooth(&frame(0.0, 1.0));
    let out = s.smooth(&frame(0.0, 1.0));
    assert_eq!(s.len(), 2);
    assert_eq!(out.get("nose").unwrap().x, 0.0);
}

#[test]
fn clear_resets_history() {
    let mut s = KeypointSmoother::new(3);
    s.smooth(&frame(50.0, 1.0));
    s.clear();
    assert!(s.is_empty());
    let out = s.smooth(&frame(10.0, 1.0));
    assert_eq!(out.get("nose").unwrap().x, 10.0);
}

#[test]
fn zero_confidence_history_keeps_raw_value() {
    let mut s = KeypointSmoother::new(3);
    let out = s.smooth(&frame(7.0, 0.0));
    assert_eq!(out.get("nose").unwrap().x, 7.0);
}
