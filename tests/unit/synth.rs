use super::*;

#[test]
fn kinds_parse_case_insensitively() {
    assert_eq!("Walk".parse::<SyntheticKind>().unwrap(), SyntheticKind::Walk);
    assert_eq!(" idle ".parse::<SyntheticKind>().unwrap(), SyntheticKind::Idle);
    assert!("jump".parse::<SyntheticKind>().is_err());
    assert_eq!(SyntheticKind::Wave.to_string(), "wave");
}

#[test]
fn generated_animations_are_consistent() {
    let fr = FrameRate::new(24.0).unwrap();
    for kind in SyntheticKind::ALL {
        let anim = generate(kind, 48, fr).unwrap();
        assert_eq!(anim.len(), 48);
        assert!((anim.duration() - 2.0).abs() < 1e-12);
        assert_eq!(anim.name(), format!("synthetic {kind}"));
        anim.validate().unwrap();
        assert!(anim.frames.iter().all(|f| !f.pose.is_empty()));
    }
}

#[test]
fn generation_is_deterministic() {
    let a = walk(30, FrameRate::DEFAULT).unwrap();
    let b = walk(30, FrameRate::DEFAULT).unwrap();
    assert_eq!(a, b);
}

#[test]
fn walk_legs_swing_in_antiphase() {
    // a quarter stride in, the legs are at opposite extremes
    let anim = walk(40, FrameRate::new(40.0).unwrap()).unwrap();
    let pose = &anim.frames[10].pose;
    let left = pose.rotation(joint::LEFT_UPPER_LEG).unwrap().to_euler(glam::EulerRot::XYZ).0;
    let right = pose.rotation(joint::RIGHT_UPPER_LEG).unwrap().to_euler(glam::EulerRot::XYZ).0;
    assert!((left - 0.5).abs() < 1e-4);
    assert!((right + 0.5).abs() < 1e-4);
}

#[test]
fn zero_frames_is_an_error() {
    assert!(idle(0, FrameRate::DEFAULT).is_err());
}
