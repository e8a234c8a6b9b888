use super::*;

#[test]
fn align_hemisphere_flips_opposite_sign() {
    let q = Quat::from_rotation_z(0.4);
    let flipped = align_hemisphere(q, -q);
    assert!(q.dot(flipped) > 0.0);
    assert_eq!(align_hemisphere(q, q), q);
}

#[test]
fn blend_weights_first_argument() {
    let a = Vec3::new(1.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 1.0, 0.0);
    let c = blend(a, 0.7, b);
    assert!((c.x - 0.7).abs() < 1e-6);
    assert!((c.y - 0.3).abs() < 1e-6);
    assert_eq!(midpoint(a, b), Vec3::new(0.5, 0.5, 0.0));
}

