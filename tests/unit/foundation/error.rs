use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PoseplayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PoseplayError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        PoseplayError::sampling("x")
            .to_string()
            .contains("sampling error:")
    );
    assert!(
        PoseplayError::retarget("x")
            .to_string()
            .contains("retarget error:")
    );
    assert!(
        PoseplayError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PoseplayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_become_serde_errors() {
    let err: PoseplayError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, PoseplayError::Serde(_)));
}
