use std::collections::BTreeMap;

use crate::foundation::core::{Dimensions, FrameRate, Quat, Vec3};
use crate::foundation::error::{PoseplayError, PoseplayResult};

/// Allowed mismatch between stored duration and `frame_count / frame_rate`, in seconds.
pub const DURATION_TOLERANCE_SECS: f64 = 1e-3;

/// Coordinate space a [`Pose`] currently lives in.
///
/// Retargeted and imported poses are in `Source` space (normalized image plane). The
/// normalizer converts them to `Model` space exactly once; see [`crate::PoseNormalizer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PoseSpace {
    /// Retargeter / interchange space.
    #[default]
    Source,
    /// Space of the consuming model, after normalization.
    Model,
}

/// Optional position and rotation for one joint; absent parts mean "unchanged".
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JointPose {
    /// Local position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Local rotation (unit quaternion, `[x, y, z, w]` in JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Quat>,
}

impl JointPose {
    /// Create a joint pose from optional parts.
    pub fn new(position: Option<Vec3>, rotation: Option<Quat>) -> Self {
        Self { position, rotation }
    }

    /// Position-only joint pose.
    pub fn from_position(position: Vec3) -> Self {
        Self::new(Some(position), None)
    }

    /// Rotation-only joint pose.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(None, Some(rotation))
    }

    /// Return `true` when neither part is present.
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none()
    }
}

/// Sparse mapping from joint name to [`JointPose`].
///
/// Applying a pose overlays only the joints it contains; joints it does not mention keep
/// whatever state the consumer already holds.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Pose {
    joints: BTreeMap<String, JointPose>,
    #[serde(skip)]
    space: PoseSpace,
}

impl Pose {
    /// Empty source-space pose.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty pose in the given space.
    pub fn in_space(space: PoseSpace) -> Self {
        Self {
            joints: BTreeMap::new(),
            space,
        }
    }

    /// Space this pose lives in.
    pub fn space(&self) -> PoseSpace {
        self.space
    }

    /// Retag the pose without touching any values.
    pub fn set_space(&mut self, space: PoseSpace) {
        self.space = space;
    }

    /// Insert or replace a joint entry.
    pub fn insert(&mut self, joint: impl Into<String>, pose: JointPose) {
        self.joints.insert(joint.into(), pose);
    }

    /// Set (or add) the position of `joint`, keeping any rotation.
    pub fn set_position(&mut self, joint: impl Into<String>, position: Vec3) {
        self.joints.entry(joint.into()).or_default().position = Some(position);
    }

    /// Set (or add) the rotation of `joint`, keeping any position.
    pub fn set_rotation(&mut self, joint: impl Into<String>, rotation: Quat) {
        self.joints.entry(joint.into()).or_default().rotation = Some(rotation);
    }

    /// Entry for `joint`.
    pub fn get(&self, joint: &str) -> Option<&JointPose> {
        self.joints.get(joint)
    }

    /// Mutable entry for `joint`.
    pub fn get_mut(&mut self, joint: &str) -> Option<&mut JointPose> {
        self.joints.get_mut(joint)
    }

    /// Position of `joint`, if present.
    pub fn position(&self, joint: &str) -> Option<Vec3> {
        self.joints.get(joint).and_then(|j| j.position)
    }

    /// Rotation of `joint`, if present.
    pub fn rotation(&self, joint: &str) -> Option<Quat> {
        self.joints.get(joint).and_then(|j| j.rotation)
    }

    /// Remove and return the entry for `joint`.
    pub fn remove(&mut self, joint: &str) -> Option<JointPose> {
        self.joints.remove(joint)
    }

    /// Return `true` when `joint` has an entry.
    pub fn contains(&self, joint: &str) -> bool {
        self.joints.contains_key(joint)
    }

    /// Number of joint entries.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Return `true` when no joint has an entry.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Entries in joint-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JointPose)> {
        self.joints.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable entries in joint-name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut JointPose)> {
        self.joints.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Joint names in order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.keys().map(String::as_str)
    }

    /// Drop entries that carry neither a position nor a rotation.
    pub fn prune_empty(&mut self) {
        self.joints.retain(|_, j| !j.is_empty());
    }
}

impl FromIterator<(String, JointPose)> for Pose {
    fn from_iter<I: IntoIterator<Item = (String, JointPose)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
            space: PoseSpace::Source,
        }
    }
}

/// One timestamped pose of an [`Animation`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFrame {
    /// 0-based frame number.
    pub frame_index: usize,
    /// Seconds from animation start.
    pub timestamp: f64,
    /// Joint data for this frame.
    #[serde(rename = "joints")]
    pub pose: Pose,
}

impl AnimationFrame {
    /// Create a frame whose timestamp is derived from its index.
    pub fn at(frame_index: usize, frame_rate: FrameRate, pose: Pose) -> Self {
        Self {
            frame_index,
            timestamp: frame_rate.frames_to_secs(frame_index),
            pose,
        }
    }
}

/// Descriptive data stored alongside an animation's frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationMetadata {
    /// Display name.
    pub name: String,
    /// Number of frames.
    pub frame_count: usize,
    /// Frames per second, > 0.
    pub frame_rate: f64,
    /// Length in seconds; equals `frame_count / frame_rate`.
    pub duration: f64,
    /// Source image dimensions used while retargeting.
    pub dimensions: Dimensions,
}

/// Ordered frames plus metadata.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Animation {
    /// Metadata block.
    pub metadata: AnimationMetadata,
    /// Frames ordered by index.
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    /// Build an animation, deriving frame count and duration from `frames`.
    pub fn new(
        name: impl Into<String>,
        frame_rate: FrameRate,
        dimensions: Dimensions,
        frames: Vec<AnimationFrame>,
    ) -> Self {
        let frame_count = frames.len();
        Self {
            metadata: AnimationMetadata {
                name: name.into(),
                frame_count,
                frame_rate: frame_rate.as_f64(),
                duration: frame_rate.frames_to_secs(frame_count),
                dimensions,
            },
            frames,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Validated frame rate.
    pub fn frame_rate(&self) -> PoseplayResult<FrameRate> {
        FrameRate::new(self.metadata.frame_rate)
    }

    /// Duration in seconds as stored in metadata.
    pub fn duration(&self) -> f64 {
        self.metadata.duration
    }

    /// Number of frames actually held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Return `true` when the animation can be sampled.
    pub fn is_playable(&self) -> bool {
        !self.frames.is_empty() && self.frame_rate().is_ok()
    }

    /// Recompute `frame_count` and `duration` from the frames and frame rate.
    pub fn refresh_metadata(&mut self) -> PoseplayResult<()> {
        let fr = self.frame_rate()?;
        self.metadata.frame_count = self.frames.len();
        self.metadata.duration = fr.frames_to_secs(self.frames.len());
        Ok(())
    }

    /// Check the metadata invariants.
    pub fn validate(&self) -> PoseplayResult<()> {
        let fr = self
            .frame_rate()
            .map_err(|e| PoseplayError::animation(e.to_string()))?;
        if self.metadata.frame_count != self.frames.len() {
            return Err(PoseplayError::animation(format!(
                "frameCount {} does not match {} frames",
                self.metadata.frame_count,
                self.frames.len()
            )));
        }
        let expected = fr.frames_to_secs(self.frames.len());
        if (self.metadata.duration - expected).abs() > DURATION_TOLERANCE_SECS {
            return Err(PoseplayError::animation(format!(
                "duration {} does not match frameCount/frameRate = {expected}",
                self.metadata.duration
            )));
        }
        if !self.metadata.dimensions.is_valid() {
            return Err(PoseplayError::animation("dimensions must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/model.rs"]
mod tests;
