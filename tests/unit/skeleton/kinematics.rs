use super::*;
use crate::skeleton::definition::{JointDefinition, joint};
use std::collections::BTreeMap;

fn vec_close(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() < eps
}

fn two_joint_chain(rotation: Quat) -> SkeletonKinematics {
    let joints = vec![
        JointDefinition::new("Root", Vec3::ZERO, &["Arm"]).with_rotation(rotation),
        JointDefinition::new("Arm", Vec3::new(1.0, 0.0, 0.0), &[]),
    ];
    let def = SkeletonDefinition::new(joints, BTreeMap::new(), vec![]).unwrap();
    SkeletonKinematics::new(Arc::new(def))
}

#[test]
fn identity_chain_sums_local_offsets() {
    let kin = SkeletonKinematics::humanoid();
    let def = kin.definition();
    for name in kin.joint_names() {
        let mut expected = Vec3::ZERO;
        let mut cur = Some(name);
        while let Some(n) = cur {
            expected += def.joint(n).unwrap().position;
            cur = def.parent_of(n);
        }
        assert!(
            vec_close(kin.world_position(name).unwrap(), expected, 1e-6),
            "{name}"
        );
    }
}

#[test]
fn rotated_parent_moves_child() {
    let kin = two_joint_chain(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
    let arm = kin.world_position("Arm").unwrap();
    assert!(vec_close(arm, Vec3::new(0.0, 1.0, 0.0), 1e-6), "{arm:?}");
}

#[test]
fn set_joint_local_recomputes_descendants() {
    let mut kin = two_joint_chain(Quat::IDENTITY);
    assert!(kin.set_joint_local(
        "Root",
        Some(Vec3::new(0.0, 0.0, 2.0)),
        Some(Quat::from_rotation_y(std::f32::consts::PI))
    ));
    let arm = kin.world_position("Arm").unwrap();
    assert!(vec_close(arm, Vec3::new(-1.0, 0.0, 2.0), 1e-6), "{arm:?}");
    let rot = kin.world_rotation("Arm").unwrap();
    assert!(rot.dot(Quat::from_rotation_y(std::f32::consts::PI)).abs() > 1.0 - 1e-6);
}

#[test]
fn unknown_joint_is_tolerated() {
    let mut kin = SkeletonKinematics::humanoid();
    let before = kin.export_pose();
    assert!(!kin.set_joint_local("Tail", Some(Vec3::ONE), None));
    assert_eq!(kin.export_pose(), before);
}

#[test]
fn apply_pose_is_a_sparse_overlay() {
    let mut kin = SkeletonKinematics::humanoid();
    kin.set_joint_local(joint::LEFT_UPPER_ARM, None, Some(Quat::from_rotation_z(0.7)));
    kin.set_joint_local(joint::HIPS, Some(Vec3::new(0.1, 0.9, 0.0)), None);
    let before = kin.export_pose();
    let world_before: Vec<_> = kin
        .joint_names()
        .map(|n| (n.to_owned(), kin.world_position(n).unwrap()))
        .collect();

    let mut pose = Pose::new();
    pose.set_rotation(joint::HEAD, Quat::from_rotation_x(0.4));
    kin.apply_pose(&pose);

    let after = kin.export_pose();
    for (name, j) in before.iter() {
        if name == joint::HEAD {
            assert_eq!(after.rotation(name), Some(Quat::from_rotation_x(0.4)));
        } else {
            assert_eq!(after.get(name), Some(j), "{name} changed");
        }
    }
    for (name, pos) in world_before {
        assert!(vec_close(kin.world_position(&name).unwrap(), pos, 1e-6));
    }
}

#[test]
fn apply_pose_ignores_non_root_positions() {
    let mut kin = SkeletonKinematics::humanoid();
    let default_hand = kin.joint(joint::LEFT_HAND).unwrap().local_position;

    let mut pose = Pose::new();
    pose.set_position(joint::LEFT_HAND, Vec3::new(5.0, 5.0, 5.0));
    pose.set_position(joint::HIPS, Vec3::new(0.0, 0.8, 0.0));
    pose.set_rotation("NotAJoint", Quat::IDENTITY);
    kin.apply_pose(&pose);

    assert_eq!(kin.joint(joint::LEFT_HAND).unwrap().local_position, default_hand);
    assert_eq!(
        kin.joint(joint::HIPS).unwrap().local_position,
        Vec3::new(0.0, 0.8, 0.0)
    );
}

#[test]
fn initialize_restores_defaults() {
    let mut kin = SkeletonKinematics::humanoid();
    let defaults = kin.export_pose();
    let mut pose = Pose::new();
    pose.set_rotation(joint::SPINE, Quat::from_rotation_x(0.3));
    kin.apply_pose(&pose);
    assert_ne!(kin.export_pose(), defaults);
    kin.initialize();
    assert_eq!(kin.export_pose(), defaults);
    kin.initialize();
    assert_eq!(kin.export_pose(), defaults);
}

#[test]
fn export_import_round_trip_is_dense() {
    let mut kin = SkeletonKinematics::humanoid();
    kin.set_joint_local(joint::LEFT_LOWER_ARM, Some(Vec3::new(0.3, 0.0, 0.0)), None);
    let snapshot = kin.export_pose();
    assert_eq!(snapshot.len(), 22);

    let mut other = SkeletonKinematics::humanoid();
    other.import_pose(&snapshot);
    assert_eq!(other.export_pose(), snapshot);
    assert_eq!(
        other.world_position(joint::LEFT_HAND),
        kin.world_position(joint::LEFT_HAND)
    );
}

#[test]
fn custom_position_joints_are_honored() {
    let mut kin = SkeletonKinematics::humanoid().with_position_joints(vec![joint::HEAD.to_owned()]);
    let mut pose = Pose::new();
    pose.set_position(joint::HEAD, Vec3::new(0.0, 0.3, 0.0));
    pose.set_position(joint::HIPS, Vec3::ZERO);
    kin.apply_pose(&pose);
    assert_eq!(kin.joint(joint::HEAD).unwrap().local_position, Vec3::new(0.0, 0.3, 0.0));
    assert_eq!(kin.joint(joint::HIPS).unwrap().local_position, Vec3::new(0.0, 1.0, 0.0));
}
