use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use crate::foundation::core::{Quat, Vec3};
use crate::foundation::error::{PoseplayError, PoseplayResult};

/// Joint names of the built-in humanoid hierarchy.
pub mod joint {
    /// Hierarchy root; carries the global placement of the character.
    pub const ROOT: &str = "Root";
    /// Pelvis.
    pub const HIPS: &str = "Hips";
    /// Lower spine.
    pub const SPINE: &str = "Spine";
    /// Upper spine.
    pub const CHEST: &str = "Chest";
    /// Neck.
    pub const NECK: &str = "Neck";
    /// Head.
    pub const HEAD: &str = "Head";
    /// Left clavicle.
    pub const LEFT_SHOULDER: &str = "LeftShoulder";
    /// Left upper arm.
    pub const LEFT_UPPER_ARM: &str = "LeftUpperArm";
    /// Left forearm (elbow pivot).
    pub const LEFT_LOWER_ARM: &str = "LeftLowerArm";
    /// Left hand (wrist pivot).
    pub const LEFT_HAND: &str = "LeftHand";
    /// Right clavicle.
    pub const RIGHT_SHOULDER: &str = "RightShoulder";
    /// Right upper arm.
    pub const RIGHT_UPPER_ARM: &str = "RightUpperArm";
    /// Right forearm (elbow pivot).
    pub const RIGHT_LOWER_ARM: &str = "RightLowerArm";
    /// Right hand (wrist pivot).
    pub const RIGHT_HAND: &str = "RightHand";
    /// Left thigh (hip pivot).
    pub const LEFT_UPPER_LEG: &str = "LeftUpperLeg";
    /// Left shin (knee pivot).
    pub const LEFT_LOWER_LEG: &str = "LeftLowerLeg";
    /// Left foot (ankle pivot).
    pub const LEFT_FOOT: &str = "LeftFoot";
    /// Left toes.
    pub const LEFT_TOES: &str = "LeftToes";
    /// Right thigh (hip pivot).
    pub const RIGHT_UPPER_LEG: &str = "RightUpperLeg";
    /// Right shin (knee pivot).
    pub const RIGHT_LOWER_LEG: &str = "RightLowerLeg";
    /// Right foot (ankle pivot).
    pub const RIGHT_FOOT: &str = "RightFoot";
    /// Right toes.
    pub const RIGHT_TOES: &str = "RightToes";
}

/// Joints whose local position may be driven by poses; every other joint is rotation-only.
pub const ROOT_LEVEL_JOINTS: [&str; 2] = [joint::ROOT, joint::HIPS];

/// Inclusive angle range in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AngleRange {
    /// Lower bound in degrees.
    pub min: f32,
    /// Upper bound in degrees.
    pub max: f32,
}

impl AngleRange {
    /// Create a range; callers keep `min <= max`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Return `true` when `deg` lies in `[min, max]`.
    pub fn contains(self, deg: f32) -> bool {
        self.min <= deg && deg <= self.max
    }
}

/// Per-axis rotation limits for one joint.
///
/// Limits are advisory metadata: nothing in retargeting, interpolation or playback clamps
/// rotations against them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JointLimits {
    /// Rotation about the local X axis.
    pub x: AngleRange,
    /// Rotation about the local Y axis.
    pub y: AngleRange,
    /// Rotation about the local Z axis.
    pub z: AngleRange,
}

impl JointLimits {
    /// Create limits from `(min, max)` degree pairs.
    pub const fn new(x: (f32, f32), y: (f32, f32), z: (f32, f32)) -> Self {
        Self {
            x: AngleRange::new(x.0, x.1),
            y: AngleRange::new(y.0, y.1),
            z: AngleRange::new(z.0, z.1),
        }
    }

    /// Return `true` when the XYZ Euler decomposition of `rotation` lies inside every range.
    pub fn contains(&self, rotation: Quat) -> bool {
        let (x, y, z) = rotation.normalize().to_euler(glam::EulerRot::XYZ);
        self.x.contains(x.to_degrees())
            && self.y.contains(y.to_degrees())
            && self.z.contains(z.to_degrees())
    }
}

/// Static description of one joint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JointDefinition {
    /// Unique joint name.
    pub name: String,
    /// Default local position relative to the parent.
    pub position: Vec3,
    /// Default local rotation relative to the parent.
    pub rotation: Quat,
    /// Ordered child joint names.
    pub children: Vec<String>,
}

impl JointDefinition {
    /// Create a joint with identity default rotation.
    pub fn new(name: impl Into<String>, position: Vec3, children: &[&str]) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            children: children.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    /// Replace the default local rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Detector keypoint name to skeleton joint name table for one detector source.
///
/// The table need not be total; keypoints without an entry are ignored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeypointMapping {
    /// Detector source name, e.g. `"YOLO"`.
    pub source: String,
    /// Keypoint name to joint name.
    pub keypoints: BTreeMap<String, String>,
}

impl KeypointMapping {
    /// Build a table from `(keypoint, joint)` pairs.
    pub fn from_pairs(source: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self {
            source: source.into(),
            keypoints: pairs
                .iter()
                .map(|(k, j)| ((*k).to_owned(), (*j).to_owned()))
                .collect(),
        }
    }

    /// Joint driven by `keypoint`, if mapped.
    pub fn joint_for(&self, keypoint: &str) -> Option<&str> {
        self.keypoints.get(keypoint).map(String::as_str)
    }

    /// Keypoint that drives `joint`, if any.
    pub fn keypoint_for(&self, joint: &str) -> Option<&str> {
        self.keypoints
            .iter()
            .find(|(_, j)| j.as_str() == joint)
            .map(|(k, _)| k.as_str())
    }
}

/// Immutable joint hierarchy, default pose, rotation limits and keypoint tables.
#[derive(Clone, Debug)]
pub struct SkeletonDefinition {
    joints: Vec<JointDefinition>,
    index_by_name: BTreeMap<String, usize>,
    parent_by_name: BTreeMap<String, String>,
    root: String,
    limits: BTreeMap<String, JointLimits>,
    mappings: BTreeMap<String, KeypointMapping>,
}

static HUMANOID: LazyLock<Arc<SkeletonDefinition>> = LazyLock::new(|| {
    // The built-in tables are covered by tests; a failure here is a programming error.
    Arc::new(
        SkeletonDefinition::new(humanoid_joints(), humanoid_limits(), humanoid_mappings())
            .unwrap_or_else(|e| panic!("built-in humanoid skeleton is invalid: {e}")),
    )
});

impl SkeletonDefinition {
    /// Build and validate a definition.
    ///
    /// The joints must form a single rooted tree: unique names, known children, each joint
    /// listed as a child at most once, exactly one parentless joint, every joint reachable
    /// from it. Limits and mappings may only reference known joints.
    pub fn new(
        joints: Vec<JointDefinition>,
        limits: BTreeMap<String, JointLimits>,
        mappings: Vec<KeypointMapping>,
    ) -> PoseplayResult<Self> {
        if joints.is_empty() {
            return Err(PoseplayError::validation("skeleton has no joints"));
        }

        let mut index_by_name = BTreeMap::new();
        for (i, j) in joints.iter().enumerate() {
            if index_by_name.insert(j.name.clone(), i).is_some() {
                return Err(PoseplayError::validation(format!(
                    "duplicate joint name '{}'",
                    j.name
                )));
            }
        }

        let mut parent_by_name = BTreeMap::new();
        for j in &joints {
            for c in &j.children {
                if !index_by_name.contains_key(c) {
                    return Err(PoseplayError::validation(format!(
                        "joint '{}' lists unknown child '{c}'",
                        j.name
                    )));
                }
                if let Some(prev) = parent_by_name.insert(c.clone(), j.name.clone()) {
                    return Err(PoseplayError::validation(format!(
                        "joint '{c}' has two parents ('{prev}' and '{}')",
                        j.name
                    )));
                }
            }
        }

        let roots: Vec<&str> = joints
            .iter()
            .map(|j| j.name.as_str())
            .filter(|n| !parent_by_name.contains_key(*n))
            .collect();
        let root = match roots.as_slice() {
            [single] => (*single).to_owned(),
            [] => return Err(PoseplayError::validation("skeleton has no root joint")),
            many => {
                return Err(PoseplayError::validation(format!(
                    "skeleton has multiple root joints: {}",
                    many.join(", ")
                )));
            }
        };

        for name in limits.keys() {
            if !index_by_name.contains_key(name) {
                return Err(PoseplayError::validation(format!(
                    "limits reference unknown joint '{name}'"
                )));
            }
        }

        let mut mapping_by_source = BTreeMap::new();
        for m in mappings {
            if let Some((kp, j)) = m
                .keypoints
                .iter()
                .find(|(_, j)| !index_by_name.contains_key(j.as_str()))
            {
                return Err(PoseplayError::validation(format!(
                    "mapping '{}' sends keypoint '{kp}' to unknown joint '{j}'",
                    m.source
                )));
            }
            mapping_by_source.insert(m.source.clone(), m);
        }

        let def = Self {
            joints,
            index_by_name,
            parent_by_name,
            root,
            limits,
            mappings: mapping_by_source,
        };

        // With one parent per joint, a cycle shows up as joints unreachable from the root.
        let reachable = def.traversal_order().len();
        if reachable != def.joints.len() {
            return Err(PoseplayError::validation(format!(
                "{} joint(s) are not reachable from root '{}'",
                def.joints.len() - reachable,
                def.root
            )));
        }

        Ok(def)
    }

    /// The shared built-in 22-joint humanoid definition.
    pub fn humanoid() -> Arc<Self> {
        Arc::clone(&HUMANOID)
    }

    /// Name of the root joint.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// All joints in declaration order.
    pub fn joints(&self) -> &[JointDefinition] {
        &self.joints
    }

    /// Number of joints.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Always `false` for a validated definition.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Look up a joint by name.
    pub fn joint(&self, name: &str) -> Option<&JointDefinition> {
        self.index_by_name.get(name).map(|&i| &self.joints[i])
    }

    /// Return `true` when `name` is a joint of this skeleton.
    pub fn contains(&self, name: &str) -> bool {
        self.index_by_name.contains_key(name)
    }

    /// Parent of `name`; `None` for the root and for unknown joints.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parent_by_name.get(name).map(String::as_str)
    }

    /// Advisory rotation limits for `name`.
    pub fn limits(&self, name: &str) -> Option<&JointLimits> {
        self.limits.get(name)
    }

    /// Keypoint table registered for a detector source.
    pub fn keypoint_mapping(&self, source: &str) -> Option<&KeypointMapping> {
        self.mappings.get(source)
    }

    /// Names of the registered detector sources.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    /// Depth-first preorder of joint names starting at the root; parents precede children.
    pub fn traversal_order(&self) -> Vec<&str> {
        let mut order = Vec::with_capacity(self.joints.len());
        let mut seen = BTreeSet::new();
        let mut stack = vec![self.root.as_str()];
        while let Some(name) = stack.pop() {
            if !seen.insert(name) {
                continue;
            }
            order.push(name);
            if let Some(j) = self.joint(name) {
                for c in j.children.iter().rev() {
                    stack.push(c.as_str());
                }
            }
        }
        order
    }
}

fn humanoid_joints() -> Vec<JointDefinition> {
    use joint::*;

    vec![
        JointDefinition::new(ROOT, Vec3::ZERO, &[HIPS]),
        JointDefinition::new(
            HIPS,
            Vec3::new(0.0, 1.0, 0.0),
            &[SPINE, LEFT_UPPER_LEG, RIGHT_UPPER_LEG],
        ),
        JointDefinition::new(SPINE, Vec3::new(0.0, 0.1, 0.0), &[CHEST]),
        JointDefinition::new(
            CHEST,
            Vec3::new(0.0, 0.15, 0.0),
            &[NECK, LEFT_SHOULDER, RIGHT_SHOULDER],
        ),
        JointDefinition::new(NECK, Vec3::new(0.0, 0.2, 0.0), &[HEAD]),
        JointDefinition::new(HEAD, Vec3::new(0.0, 0.1, 0.0), &[]),
        JointDefinition::new(LEFT_SHOULDER, Vec3::new(0.05, 0.15, 0.0), &[LEFT_UPPER_ARM]),
        JointDefinition::new(LEFT_UPPER_ARM, Vec3::new(0.1, 0.0, 0.0), &[LEFT_LOWER_ARM]),
        JointDefinition::new(LEFT_LOWER_ARM, Vec3::new(0.25, 0.0, 0.0), &[LEFT_HAND]),
        JointDefinition::new(LEFT_HAND, Vec3::new(0.25, 0.0, 0.0), &[]),
        JointDefinition::new(
            RIGHT_SHOULDER,
            Vec3::new(-0.05, 0.15, 0.0),
            &[RIGHT_UPPER_ARM],
        ),
        JointDefinition::new(RIGHT_UPPER_ARM, Vec3::new(-0.1, 0.0, 0.0), &[RIGHT_LOWER_ARM]),
        JointDefinition::new(RIGHT_LOWER_ARM, Vec3::new(-0.25, 0.0, 0.0), &[RIGHT_HAND]),
        JointDefinition::new(RIGHT_HAND, Vec3::new(-0.25, 0.0, 0.0), &[]),
        JointDefinition::new(LEFT_UPPER_LEG, Vec3::new(0.1, -0.05, 0.0), &[LEFT_LOWER_LEG]),
        JointDefinition::new(LEFT_LOWER_LEG, Vec3::new(0.0, -0.45, 0.0), &[LEFT_FOOT]),
        JointDefinition::new(LEFT_FOOT, Vec3::new(0.0, -0.45, 0.0), &[LEFT_TOES]),
        JointDefinition::new(LEFT_TOES, Vec3::new(0.0, -0.05, 0.1), &[]),
        JointDefinition::new(
            RIGHT_UPPER_LEG,
            Vec3::new(-0.1, -0.05, 0.0),
            &[RIGHT_LOWER_LEG],
        ),
        JointDefinition::new(RIGHT_LOWER_LEG, Vec3::new(0.0, -0.45, 0.0), &[RIGHT_FOOT]),
        JointDefinition::new(RIGHT_FOOT, Vec3::new(0.0, -0.45, 0.0), &[RIGHT_TOES]),
        JointDefinition::new(RIGHT_TOES, Vec3::new(0.0, -0.05, 0.1), &[]),
    ]
}

fn humanoid_limits() -> BTreeMap<String, JointLimits> {
    use joint::*;

    let table: [(&str, JointLimits); 17] = [
        (HIPS, JointLimits::new((-45.0, 45.0), (-90.0, 90.0), (-30.0, 30.0))),
        (SPINE, JointLimits::new((-30.0, 45.0), (-30.0, 30.0), (-20.0, 20.0))),
        (CHEST, JointLimits::new((-20.0, 30.0), (-30.0, 30.0), (-20.0, 20.0))),
        (NECK, JointLimits::new((-45.0, 45.0), (-60.0, 60.0), (-30.0, 30.0))),
        (HEAD, JointLimits::new((-60.0, 60.0), (-80.0, 80.0), (-45.0, 45.0))),
        (LEFT_SHOULDER, JointLimits::new((-15.0, 15.0), (-20.0, 20.0), (-10.0, 30.0))),
        (LEFT_UPPER_ARM, JointLimits::new((-90.0, 90.0), (-100.0, 100.0), (-90.0, 160.0))),
        (LEFT_LOWER_ARM, JointLimits::new((-10.0, 10.0), (-150.0, 0.0), (-90.0, 90.0))),
        (RIGHT_SHOULDER, JointLimits::new((-15.0, 15.0), (-20.0, 20.0), (-30.0, 10.0))),
        (RIGHT_UPPER_ARM, JointLimits::new((-90.0, 90.0), (-100.0, 100.0), (-160.0, 90.0))),
        (RIGHT_LOWER_ARM, JointLimits::new((-10.0, 10.0), (0.0, 150.0), (-90.0, 90.0))),
        (LEFT_UPPER_LEG, JointLimits::new((-120.0, 45.0), (-45.0, 45.0), (-30.0, 60.0))),
        (LEFT_LOWER_LEG, JointLimits::new((0.0, 150.0), (-10.0, 10.0), (-10.0, 10.0))),
        (LEFT_FOOT, JointLimits::new((-45.0, 30.0), (-20.0, 20.0), (-20.0, 20.0))),
        (RIGHT_UPPER_LEG, JointLimits::new((-120.0, 45.0), (-45.0, 45.0), (-60.0, 30.0))),
        (RIGHT_LOWER_LEG, JointLimits::new((0.0, 150.0), (-10.0, 10.0), (-10.0, 10.0))),
        (RIGHT_FOOT, JointLimits::new((-45.0, 30.0), (-20.0, 20.0), (-20.0, 20.0))),
    ];
    table
        .into_iter()
        .map(|(name, limits)| (name.to_owned(), limits))
        .collect()
}

fn humanoid_mappings() -> Vec<KeypointMapping> {
    use joint::*;

    let shared: [(&str, &str); 13] = [
        ("nose", HEAD),
        ("left_shoulder", LEFT_SHOULDER),
        ("right_shoulder", RIGHT_SHOULDER),
        ("left_elbow", LEFT_LOWER_ARM),
        ("right_elbow", RIGHT_LOWER_ARM),
        ("left_wrist", LEFT_HAND),
        ("right_wrist", RIGHT_HAND),
        ("left_hip", LEFT_UPPER_LEG),
        ("right_hip", RIGHT_UPPER_LEG),
        ("left_knee", LEFT_LOWER_LEG),
        ("right_knee", RIGHT_LOWER_LEG),
        ("left_ankle", LEFT_FOOT),
        ("right_ankle", RIGHT_FOOT),
    ];

    let yolo = KeypointMapping::from_pairs("YOLO", &shared);

    let mut mediapipe = KeypointMapping::from_pairs("MediaPipe", &shared);
    mediapipe
        .keypoints
        .insert("left_foot_index".to_owned(), LEFT_TOES.to_owned());
    mediapipe
        .keypoints
        .insert("right_foot_index".to_owned(), RIGHT_TOES.to_owned());

    vec![yolo, mediapipe]
}

#[cfg(test)]
#[path = "../../tests/unit/skeleton/definition.rs"]
mod tests;
