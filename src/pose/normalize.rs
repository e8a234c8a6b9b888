use crate::config::NormalizerConfig;
use crate::foundation::core::{Quat, Vec3};
use crate::foundation::error::PoseplayResult;
use crate::pose::model::{JointPose, Pose, PoseSpace};

/// Conservative repair pass run on every sampled pose before it reaches the model.
///
/// - every rotation is made unit length; NaN or near-zero quaternions become identity and
///   joints without a rotation get identity
/// - positions survive only on the configured root-level joints (`Root`, `Hips` by default)
/// - surviving source-space positions are damped toward the origin, then every surviving
///   position is clamped component-wise to `max_position`
///
/// The damping is applied only on the `Source -> Model` conversion, so normalizing an
/// already normalized pose changes nothing.
#[derive(Clone, Debug, Default)]
pub struct PoseNormalizer {
    config: NormalizerConfig,
}

impl PoseNormalizer {
    /// Create a normalizer after validating `config`.
    pub fn new(config: NormalizerConfig) -> PoseplayResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Return `true` when `joint` may carry position data.
    pub fn carries_position(&self, joint: &str) -> bool {
        self.config.position_joints.iter().any(|j| j == joint)
    }

    /// Produce the model-space version of `pose`.
    pub fn normalize(&self, pose: &Pose) -> Pose {
        let damping = match pose.space() {
            PoseSpace::Source => self.config.position_damping,
            PoseSpace::Model => 1.0,
        };

        let mut out = Pose::in_space(PoseSpace::Model);
        for (name, joint) in pose.iter() {
            let rotation = self.repair_rotation(name, joint.rotation);
            let position = if self.carries_position(name) {
                joint
                    .position
                    .and_then(|p| self.condition_position(name, p, damping))
            } else {
                None
            };
            out.insert(name, JointPose::new(position, Some(rotation)));
        }
        out
    }

    /// Unit-length version of `rotation`, or identity when it is missing or degenerate.
    pub fn repair_rotation(&self, joint: &str, rotation: Option<Quat>) -> Quat {
        let Some(q) = rotation else {
            return Quat::IDENTITY;
        };
        let magnitude = q.length();
        if !magnitude.is_finite() || magnitude < self.config.min_rotation_magnitude {
            tracing::debug!(joint, magnitude, "degenerate rotation replaced with identity");
            return Quat::IDENTITY;
        }
        if (magnitude - 1.0).abs() > self.config.rotation_tolerance {
            return q / magnitude;
        }
        q
    }

    fn condition_position(&self, joint: &str, position: Vec3, damping: f32) -> Option<Vec3> {
        if !position.is_finite() {
            tracing::warn!(joint, "non-finite position dropped");
            return None;
        }
        let max = self.config.max_position;
        Some((position * damping).clamp(Vec3::splat(-max), Vec3::splat(max)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/normalize.rs"]
mod tests;
