use super::*;
use crate::pose::model::PoseSpace;

fn quat_close(a: Quat, b: Quat, eps: f32) -> bool {
    // q and -q are the same rotation
    a.dot(b).abs() > 1.0 - eps
}

#[test]
fn slerp_endpoints_are_exact() {
    let a = Quat::from_rotation_x(0.3);
    let b = Quat::from_rotation_y(1.2);
    assert_eq!(slerp_rotation(a, b, 0.0), a);
    assert_eq!(slerp_rotation(a, b, 1.0), b);
}

#[test]
fn slerp_with_itself_is_identity_map() {
    let q = Quat::from_euler(glam::EulerRot::XYZ, 0.2, -0.4, 0.9);
    for alpha in [0.0, 0.1, 0.5, 0.77, 1.0] {
        assert!(quat_close(slerp_rotation(q, q, alpha), q, 1e-5));
    }
}

#[test]
fn slerp_midpoint_halves_angle() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    let mid = slerp_rotation(a, b, 0.5);
    assert!(quat_close(mid, Quat::from_rotation_z(std::f32::consts::FRAC_PI_4), 1e-5));
    assert!((mid.length() - 1.0).abs() < 1e-5);
}

#[test]
fn slerp_takes_shortest_arc_across_sign_flip() {
    let a = Quat::from_rotation_y(0.2);
    let b = -Quat::from_rotation_y(0.4);
    let mid = slerp_rotation(a, b, 0.5);
    assert!(quat_close(mid, Quat::from_rotation_y(0.3), 1e-5));
}

#[test]
fn positions_lerp_per_axis() {
    let p = lerp_position(Vec3::ZERO, Vec3::new(2.0, 4.0, -6.0), 0.25);
    assert_eq!(p, Vec3::new(0.5, 1.0, -1.5));
}

#[test]
fn non_finite_inputs_pass_first_value_through() {
    let bad = Vec3::new(0.0, f32::INFINITY, 0.0);
    assert_eq!(lerp_position(Vec3::X, bad, 0.5), Vec3::X);

    let nan = Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0);
    assert_eq!(slerp_rotation(Quat::IDENTITY, nan, 0.5), Quat::IDENTITY);
}

#[test]
fn sparse_joints_pass_through() {
    let mut a = Pose::new();
    a.set_position("Hips", Vec3::ZERO);
    a.set_rotation("Head", Quat::IDENTITY);
    let mut b = Pose::new();
    b.set_position("Hips", Vec3::new(1.0, 0.0, 0.0));
    b.set_rotation("LeftHand", Quat::from_rotation_x(1.0));

    let out = PoseInterpolator::interpolate(&a, &b, 0.5);
    assert_eq!(out.position("Hips"), Some(Vec3::new(0.5, 0.0, 0.0)));
    assert_eq!(out.rotation("Head"), Some(Quat::IDENTITY));
    assert_eq!(out.rotation("LeftHand"), Some(Quat::from_rotation_x(1.0)));
    assert!(!out.contains("Spine"));
    assert_eq!(out.len(), 3);
}

#[test]
fn partial_joint_parts_pass_through() {
    let mut a = Pose::new();
    a.set_position("Hips", Vec3::ZERO);
    let mut b = Pose::new();
    b.set_rotation("Hips", Quat::from_rotation_y(0.5));
    let out = PoseInterpolator::interpolate(&a, &b, 0.3);
    assert_eq!(out.position("Hips"), Some(Vec3::ZERO));
    assert_eq!(out.rotation("Hips"), Some(Quat::from_rotation_y(0.5)));
}

#[test]
fn alpha_is_clamped_and_space_follows_first_pose() {
    let mut a = Pose::in_space(PoseSpace::Model);
    a.set_position("Root", Vec3::ZERO);
    let mut b = Pose::new();
    b.set_position("Root", Vec3::ONE);
    let over = PoseInterpolator::interpolate(&a, &b, 7.0);
    assert_eq!(over.position("Root"), Some(Vec3::ONE));
    let nan = PoseInterpolator::interpolate(&a, &b, f32::NAN);
    assert_eq!(nan.position("Root"), Some(Vec3::ZERO));
    assert_eq!(over.space(), PoseSpace::Model);
}
