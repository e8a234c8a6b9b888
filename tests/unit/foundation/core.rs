use super::*;

#[test]
fn frame_rate_rejects_non_positive_and_nan() {
    assert!(FrameRate::new(0.0).is_err());
    assert!(FrameRate::new(-30.0).is_err());
    assert!(FrameRate::new(f64::NAN).is_err());
    assert!(FrameRate::new(f64::INFINITY).is_err());
    assert!(FrameRate::new(24.0).is_ok());
}

#[test]
fn frame_rate_time_conversions() {
    let fr = FrameRate::new(30.0).unwrap();
    assert_eq!(fr.secs_to_frame_floor(0.5), 15);
    assert_eq!(fr.secs_to_frame_floor(-1.0), 0);
    assert!((fr.frames_to_secs(30) - 1.0).abs() < 1e-12);
    assert!((fr.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
}

#[test]
fn dimensions_default_and_validation() {
    assert_eq!(Dimensions::default(), Dimensions::new(640, 480).unwrap());
    assert!(Dimensions::new(0, 480).is_err());
    assert!(
        !Dimensions {
            width: 10,
            height: 0
        }
        .is_valid()
    );
}
