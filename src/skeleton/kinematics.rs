use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::core::{Quat, Vec3};
use crate::playback::sink::PoseSink;
use crate::pose::model::{JointPose, Pose};
use crate::skeleton::definition::{ROOT_LEVEL_JOINTS, SkeletonDefinition};

/// Runtime transform record for one joint.
#[derive(Clone, Debug, PartialEq)]
pub struct JointState {
    /// Parent joint; `None` for the root.
    pub parent: Option<String>,
    /// Ordered child joints.
    pub children: Vec<String>,
    /// Position relative to the parent.
    pub local_position: Vec3,
    /// Rotation relative to the parent.
    pub local_rotation: Quat,
    /// Derived world-space position.
    pub world_position: Vec3,
    /// Derived world-space rotation.
    pub world_rotation: Quat,
}

/// One skeleton instance: per-joint local transforms plus forward-kinematics world transforms.
///
/// Every mutating call recomputes world transforms before returning, so world values read
/// through this type are never stale.
#[derive(Clone, Debug)]
pub struct SkeletonKinematics {
    definition: Arc<SkeletonDefinition>,
    joints: BTreeMap<String, JointState>,
    order: Vec<String>,
    position_joints: Vec<String>,
}

impl SkeletonKinematics {
    /// Create an instance in the definition's default pose.
    pub fn new(definition: Arc<SkeletonDefinition>) -> Self {
        let order = definition
            .traversal_order()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let joints = definition
            .joints()
            .iter()
            .map(|j| {
                let state = JointState {
                    parent: definition.parent_of(&j.name).map(str::to_owned),
                    children: j.children.clone(),
                    local_position: j.position,
                    local_rotation: j.rotation,
                    world_position: j.position,
                    world_rotation: j.rotation,
                };
                (j.name.clone(), state)
            })
            .collect();

        let mut kin = Self {
            definition,
            joints,
            order,
            position_joints: ROOT_LEVEL_JOINTS.iter().map(|j| (*j).to_owned()).collect(),
        };
        kin.initialize();
        kin
    }

    /// Instance of the built-in humanoid.
    pub fn humanoid() -> Self {
        Self::new(SkeletonDefinition::humanoid())
    }

    /// Replace the set of joints whose positions [`Self::apply_pose`] honors.
    pub fn with_position_joints(mut self, joints: Vec<String>) -> Self {
        self.position_joints = joints;
        self
    }

    /// Definition this instance was built from.
    pub fn definition(&self) -> &SkeletonDefinition {
        &self.definition
    }

    /// Reset every joint to its default local transform and recompute world transforms.
    pub fn initialize(&mut self) {
        for j in self.definition.joints() {
            if let Some(state) = self.joints.get_mut(&j.name) {
                state.local_position = j.position;
                state.local_rotation = j.rotation;
            }
        }
        self.compute_world_transforms();
    }

    /// Overwrite the local transform parts that are given.
    ///
    /// Unknown joints are logged and ignored; returns whether the joint exists.
    pub fn set_joint_local(
        &mut self,
        name: &str,
        position: Option<Vec3>,
        rotation: Option<Quat>,
    ) -> bool {
        let Some(state) = self.joints.get_mut(name) else {
            tracing::warn!(joint = name, "set_joint_local: unknown joint ignored");
            return false;
        };
        if let Some(p) = position {
            state.local_position = p;
        }
        if let Some(r) = rotation {
            state.local_rotation = r;
        }
        self.compute_world_transforms();
        true
    }

    /// Forward kinematics from the root down.
    ///
    /// Root: world = local. Other joints: `world_pos = parent_pos + parent_rot * local_pos`,
    /// `world_rot = parent_rot * local_rot`.
    pub fn compute_world_transforms(&mut self) {
        for name in &self.order {
            let parent_world = self
                .joints
                .get(name)
                .and_then(|s| s.parent.as_deref())
                .and_then(|p| self.joints.get(p))
                .map(|p| (p.world_position, p.world_rotation));

            let Some(state) = self.joints.get_mut(name) else {
                continue;
            };
            match parent_world {
                Some((parent_pos, parent_rot)) => {
                    state.world_position = parent_pos + parent_rot * state.local_position;
                    state.world_rotation = parent_rot * state.local_rotation;
                }
                None => {
                    state.world_position = state.local_position;
                    state.world_rotation = state.local_rotation;
                }
            }
        }
    }

    /// Sparse overlay of `pose`: rotations for any known joint, positions only for the
    /// root-level joints. Joints absent from `pose` keep their current transforms.
    pub fn apply_pose(&mut self, pose: &Pose) {
        for (name, joint) in pose.iter() {
            let carries_position = self.position_joints.iter().any(|j| j == name);
            let Some(state) = self.joints.get_mut(name) else {
                tracing::debug!(joint = name, "apply_pose: unknown joint ignored");
                continue;
            };
            if let Some(r) = joint.rotation {
                state.local_rotation = r;
            }
            if carries_position && let Some(p) = joint.position {
                state.local_position = p;
            }
        }
        self.compute_world_transforms();
    }

    /// Dense snapshot of every joint's current local position and rotation.
    pub fn export_pose(&self) -> Pose {
        self.joints
            .iter()
            .map(|(name, s)| {
                (
                    name.clone(),
                    JointPose::new(Some(s.local_position), Some(s.local_rotation)),
                )
            })
            .collect()
    }

    /// Restore a snapshot taken with [`Self::export_pose`]: positions and rotations are
    /// written for every known joint in `pose`, including non-root joints.
    pub fn import_pose(&mut self, pose: &Pose) {
        for (name, joint) in pose.iter() {
            let Some(state) = self.joints.get_mut(name) else {
                tracing::debug!(joint = name, "import_pose: unknown joint ignored");
                continue;
            };
            if let Some(p) = joint.position {
                state.local_position = p;
            }
            if let Some(r) = joint.rotation {
                state.local_rotation = r;
            }
        }
        self.compute_world_transforms();
    }

    /// Runtime record for `name`.
    pub fn joint(&self, name: &str) -> Option<&JointState> {
        self.joints.get(name)
    }

    /// World-space position of `name`.
    pub fn world_position(&self, name: &str) -> Option<Vec3> {
        self.joints.get(name).map(|s| s.world_position)
    }

    /// World-space rotation of `name`.
    pub fn world_rotation(&self, name: &str) -> Option<Quat> {
        self.joints.get(name).map(|s| s.world_rotation)
    }

    /// Joint names in root-first traversal order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl PoseSink for SkeletonKinematics {
    fn apply_pose(&mut self, pose: &Pose) {
        SkeletonKinematics::apply_pose(self, pose);
    }

    fn reset_to_default(&mut self) {
        self.initialize();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/skeleton/kinematics.rs"]
mod tests;
