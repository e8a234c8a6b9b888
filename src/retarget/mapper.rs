use std::sync::Arc;

use crate::config::RetargetConfig;
use crate::foundation::core::{Dimensions, Quat, Vec3};
use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::foundation::math::{blend, midpoint};
use crate::pose::model::{Animation, AnimationFrame, Pose};
use crate::retarget::continuity::fix_rotation_discontinuities;
use crate::retarget::keypoint::{DetectorInput, Keypoint, KeypointSet};
use crate::retarget::smooth::KeypointSmoother;
use crate::skeleton::definition::{KeypointMapping, SkeletonDefinition, joint};

const MIN_BONE_LENGTH: f32 = 1e-6;

/// Direction a bone points along in the bind pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoneAxis {
    /// `+Y`; spine and head chain.
    Up,
    /// `-Y`; legs.
    Down,
    /// `+X`; left arm.
    LeftOutward,
    /// `-X`; right arm.
    RightOutward,
}

impl BoneAxis {
    /// Unit vector for this axis.
    pub fn vector(self) -> Vec3 {
        match self {
            Self::Up => Vec3::Y,
            Self::Down => Vec3::NEG_Y,
            Self::LeftOutward => Vec3::X,
            Self::RightOutward => Vec3::NEG_X,
        }
    }
}

/// One rotation estimate: `joint` receives the rotation of the bone running `from -> to`.
#[derive(Clone, Copy, Debug)]
struct BoneChain {
    joint: &'static str,
    from: &'static str,
    to: &'static str,
    axis: BoneAxis,
}

const fn chain(
    joint: &'static str,
    from: &'static str,
    to: &'static str,
    axis: BoneAxis,
) -> BoneChain {
    BoneChain {
        joint,
        from,
        to,
        axis,
    }
}

const BONE_CHAINS: [BoneChain; 12] = {
    use joint::*;
    [
        chain(HIPS, HIPS, SPINE, BoneAxis::Up),
        chain(SPINE, SPINE, CHEST, BoneAxis::Up),
        chain(CHEST, CHEST, NECK, BoneAxis::Up),
        chain(NECK, NECK, HEAD, BoneAxis::Up),
        chain(LEFT_UPPER_ARM, LEFT_SHOULDER, LEFT_LOWER_ARM, BoneAxis::LeftOutward),
        chain(LEFT_LOWER_ARM, LEFT_LOWER_ARM, LEFT_HAND, BoneAxis::LeftOutward),
        chain(RIGHT_UPPER_ARM, RIGHT_SHOULDER, RIGHT_LOWER_ARM, BoneAxis::RightOutward),
        chain(RIGHT_LOWER_ARM, RIGHT_LOWER_ARM, RIGHT_HAND, BoneAxis::RightOutward),
        chain(LEFT_UPPER_LEG, LEFT_UPPER_LEG, LEFT_LOWER_LEG, BoneAxis::Down),
        chain(LEFT_LOWER_LEG, LEFT_LOWER_LEG, LEFT_FOOT, BoneAxis::Down),
        chain(RIGHT_UPPER_LEG, RIGHT_UPPER_LEG, RIGHT_LOWER_LEG, BoneAxis::Down),
        chain(RIGHT_LOWER_LEG, RIGHT_LOWER_LEG, RIGHT_FOOT, BoneAxis::Down),
    ]
};

/// Converts 2D detector keypoints into sparse skeleton poses.
///
/// Per frame: optional mirroring of missing bilateral keypoints, optional temporal
/// smoothing, projection of mapped keypoints into the normalized image plane, derivation of
/// the trunk joints the detector never reports, and minimal-arc rotation estimates along
/// each bone chain whose endpoints are known. The only state kept between frames is the
/// smoothing cache, which is cleared at the start of every sequence.
#[derive(Clone, Debug)]
pub struct PoseRetargeter {
    definition: Arc<SkeletonDefinition>,
    mapping: KeypointMapping,
    config: RetargetConfig,
    smoother: KeypointSmoother,
}

impl PoseRetargeter {
    /// Create a retargeter for `definition` using the mapping table named by `config.source`.
    pub fn new(
        definition: Arc<SkeletonDefinition>,
        config: RetargetConfig,
    ) -> PoseplayResult<Self> {
        config.validate()?;
        let mapping = definition
            .keypoint_mapping(&config.source)
            .cloned()
            .ok_or_else(|| {
                PoseplayError::validation(format!(
                    "unknown keypoint source '{}' (known: {})",
                    config.source,
                    definition.sources().collect::<Vec<_>>().join(", ")
                ))
            })?;
        let smoother = KeypointSmoother::new(config.smoothing_window);
        Ok(Self {
            definition,
            mapping,
            config,
            smoother,
        })
    }

    /// Retargeter for the built-in humanoid.
    pub fn humanoid(config: RetargetConfig) -> PoseplayResult<Self> {
        Self::new(SkeletonDefinition::humanoid(), config)
    }

    /// Active configuration.
    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    /// Skeleton poses are produced for.
    pub fn definition(&self) -> &SkeletonDefinition {
        &self.definition
    }

    /// Keypoint table in use.
    pub fn mapping(&self) -> &KeypointMapping {
        &self.mapping
    }

    /// Drop the smoothing history.
    pub fn reset(&mut self) {
        self.smoother.clear();
    }

    /// Project a pixel keypoint into the `[-1, 1]` image plane with `+Y` up and `z = 0`.
    ///
    /// Returns `None` for keypoints below the confidence threshold, non-finite keypoints
    /// and zero dimensions.
    pub fn map_keypoint_to_position(
        &self,
        keypoint: &Keypoint,
        dimensions: Dimensions,
    ) -> Option<Vec3> {
        if !keypoint.is_valid(self.config.confidence_threshold) || !dimensions.is_valid() {
            return None;
        }
        let w = dimensions.width as f32;
        let h = dimensions.height as f32;
        let x = (keypoint.x / w) * 2.0 - 1.0;
        let y = -((keypoint.y / h) * 2.0 - 1.0);
        Some(Vec3::new(x, y, 0.0))
    }

    /// Minimal-arc rotation taking `axis` onto the direction `parent -> child`.
    ///
    /// `None` when the two points coincide or are not finite.
    pub fn estimate_bone_rotation(parent: Vec3, child: Vec3, axis: BoneAxis) -> Option<Quat> {
        let dir = child - parent;
        if !dir.is_finite() {
            return None;
        }
        let len = dir.length();
        if len < MIN_BONE_LENGTH {
            return None;
        }
        Some(Quat::from_rotation_arc(axis.vector(), dir / len))
    }

    /// Fill in Hips, Spine, Chest, Neck and Root from the observed landmarks.
    ///
    /// A derivation whose inputs are missing or below threshold is skipped, leaving the joint
    /// absent for this frame.
    pub fn derive_unobserved_joints(
        &self,
        pose: &mut Pose,
        keypoints: &KeypointSet,
        dimensions: Dimensions,
    ) {
        let at = |name: &str| {
            keypoints
                .get(name)
                .and_then(|kp| self.map_keypoint_to_position(kp, dimensions))
        };
        let pair = |left: &str, right: &str| Some(midpoint(at(left)?, at(right)?));

        let mid_hip = pair("left_hip", "right_hip");
        let mid_shoulder = pair("left_shoulder", "right_shoulder");
        let nose = at("nose");

        if let Some(hips) = mid_hip {
            pose.set_position(joint::HIPS, hips);
            pose.set_position(joint::ROOT, hips - Vec3::new(0.0, self.config.root_drop, 0.0));
        }
        if let (Some(shoulder), Some(hip)) = (mid_shoulder, mid_hip) {
            pose.set_position(joint::SPINE, midpoint(shoulder, hip));
            pose.set_position(joint::CHEST, blend(shoulder, 0.7, hip));
        }
        if let (Some(nose), Some(shoulder)) = (nose, mid_shoulder) {
            pose.set_position(joint::NECK, blend(nose, 0.3, shoulder));
        }
    }

    /// Synthesize missing bilateral keypoints by reflecting their counterpart across the
    /// body midline. Returns the number of keypoints added.
    pub fn mirror_missing(&self, keypoints: &mut KeypointSet, dimensions: Dimensions) -> usize {
        let threshold = self.config.confidence_threshold;
        let Some(center_x) = body_midline(keypoints, threshold, dimensions) else {
            return 0;
        };

        let mut mirrored = Vec::new();
        for name in self.mapping.keypoints.keys() {
            let Some(side) = name.strip_prefix("left_") else {
                continue;
            };
            let counterpart = format!("right_{side}");
            let left = keypoints.confident(name, threshold);
            let right = keypoints.confident(&counterpart, threshold);
            let (source, target) = match (left, right) {
                (Some(l), None) => (l, counterpart.clone()),
                (None, Some(r)) => (r, name.clone()),
                _ => continue,
            };
            mirrored.push(Keypoint::new(
                target,
                2.0 * center_x - source.x,
                source.y,
                source.confidence * self.config.mirror_confidence_penalty,
            ));
        }

        let added = mirrored.len();
        for kp in mirrored {
            tracing::debug!(keypoint = %kp.name, "mirrored missing keypoint");
            keypoints.replace(kp);
        }
        added
    }

    /// Retarget one frame of keypoints, advancing the smoothing history.
    pub fn retarget_frame(&mut self, keypoints: &[Keypoint], dimensions: Dimensions) -> Pose {
        let mut set = KeypointSet::from_keypoints(keypoints);
        if self.config.mirror_missing {
            self.mirror_missing(&mut set, dimensions);
        }
        if self.config.smoothing {
            set = self.smoother.smooth(&set);
        }

        let mut pose = Pose::new();
        for kp in set.iter() {
            let Some(joint_name) = self.mapping.joint_for(&kp.name) else {
                continue;
            };
            if let Some(position) = self.map_keypoint_to_position(kp, dimensions) {
                pose.set_position(joint_name, position);
            }
        }

        self.derive_unobserved_joints(&mut pose, &set, dimensions);

        for bone in &BONE_CHAINS {
            if !self.definition.contains(bone.joint) {
                continue;
            }
            let (Some(from), Some(to)) = (pose.position(bone.from), pose.position(bone.to)) else {
                continue;
            };
            if let Some(rotation) = Self::estimate_bone_rotation(from, to, bone.axis) {
                pose.set_rotation(bone.joint, rotation);
            }
        }
        pose
    }

    /// Retarget a whole detector document into an animation.
    ///
    /// Frames without a keypoints array are skipped with a warning and frames that produce no
    /// joints are dropped; surviving frames are renumbered consecutively. Fails when no frame
    /// survives.
    #[tracing::instrument(
        skip(self, input),
        fields(source = %self.config.source, detections = input.detections.len())
    )]
    pub fn process_sequence(&mut self, input: &DetectorInput) -> PoseplayResult<Animation> {
        let meta = input
            .metadata
            .resolve(&format!("{} Animation", self.config.source));
        self.reset();

        let mut frames = Vec::with_capacity(input.detections.len());
        let mut dropped = 0usize;
        for (i, detection) in input.detections.iter().enumerate() {
            let Some(keypoints) = detection.keypoints.as_deref() else {
                tracing::warn!(frame = i, "detection frame has no keypoints array; skipped");
                dropped += 1;
                continue;
            };
            let pose = self.retarget_frame(keypoints, meta.dimensions);
            if pose.is_empty() {
                tracing::debug!(frame = i, "detection frame produced no joints; dropped");
                dropped += 1;
                continue;
            }
            frames.push(AnimationFrame::at(frames.len(), meta.frame_rate, pose));
        }

        if frames.is_empty() {
            return Err(PoseplayError::retarget(format!(
                "none of {} detection frame(s) produced a pose",
                input.detections.len()
            )));
        }

        if self.config.fix_discontinuities {
            fix_rotation_discontinuities(&mut frames);
        }

        tracing::info!(frames = frames.len(), dropped, "retargeted sequence");
        Ok(Animation::new(meta.name, meta.frame_rate, meta.dimensions, frames))
    }
}

/// Pixel x of the body midline: mid-hip, else mid-shoulder, else nose, else image centre.
fn body_midline(keypoints: &KeypointSet, threshold: f32, dimensions: Dimensions) -> Option<f32> {
    let mid = |l: &str, r: &str| {
        let l = keypoints.confident(l, threshold)?;
        let r = keypoints.confident(r, threshold)?;
        Some((l.x + r.x) * 0.5)
    };
    mid("left_hip", "right_hip")
        .or_else(|| mid("left_shoulder", "right_shoulder"))
        .or_else(|| keypoints.confident("nose", threshold).map(|kp| kp.x))
        .or_else(|| dimensions.is_valid().then(|| dimensions.width as f32 * 0.5))
}

#[cfg(test)]
#[path = "../../tests/unit/retarget/mapper.rs"]
mod tests;
