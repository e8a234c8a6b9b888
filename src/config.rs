use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::skeleton::definition::ROOT_LEVEL_JOINTS;

/// Complete runtime configuration; every field has a default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PoseplayConfig {
    /// Detector-to-skeleton retargeting.
    #[serde(default)]
    pub retarget: RetargetConfig,
    /// Pose sanitization before application.
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Playback policy.
    #[serde(default)]
    pub player: PlayerConfig,
}

impl PoseplayConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(s: &str) -> PoseplayResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> PoseplayResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Validate every section.
    pub fn validate(&self) -> PoseplayResult<()> {
        self.retarget.validate()?;
        self.normalizer.validate()?;
        self.player.validate()
    }
}

/// Settings for [`crate::PoseRetargeter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetargetConfig {
    /// Keypoint-mapping table to use, e.g. `"YOLO"`.
    #[serde(default = "default_source")]
    pub source: String,
    /// Keypoints below this confidence are treated as missing.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Synthesize a missing bilateral keypoint from its counterpart.
    #[serde(default)]
    pub mirror_missing: bool,
    /// Confidence multiplier applied to mirrored keypoints.
    #[serde(default = "default_mirror_confidence_penalty")]
    pub mirror_confidence_penalty: f32,
    /// Temporally smooth keypoint pixel positions.
    #[serde(default = "default_true")]
    pub smoothing: bool,
    /// Number of frames (including the current one) the smoother averages over.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    /// Run the rotation sign-continuity pass after the sequence is built.
    #[serde(default = "default_true")]
    pub fix_discontinuities: bool,
    /// Downward offset of the derived Root below Hips, in normalized image units.
    #[serde(default = "default_root_drop")]
    pub root_drop: f32,
}

fn default_source() -> String {
    "YOLO".to_owned()
}
fn default_confidence_threshold() -> f32 {
    0.5
}
fn default_mirror_confidence_penalty() -> f32 {
    0.8
}
fn default_true() -> bool {
    true
}
fn default_smoothing_window() -> usize {
    5
}
fn default_root_drop() -> f32 {
    0.1
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            confidence_threshold: default_confidence_threshold(),
            mirror_missing: false,
            mirror_confidence_penalty: default_mirror_confidence_penalty(),
            smoothing: true,
            smoothing_window: default_smoothing_window(),
            fix_discontinuities: true,
            root_drop: default_root_drop(),
        }
    }
}

impl RetargetConfig {
    /// Check value ranges.
    pub fn validate(&self) -> PoseplayResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PoseplayError::validation(
                "retarget.confidence_threshold must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.mirror_confidence_penalty) {
            return Err(PoseplayError::validation(
                "retarget.mirror_confidence_penalty must be in [0, 1]",
            ));
        }
        if self.smoothing_window == 0 {
            return Err(PoseplayError::validation(
                "retarget.smoothing_window must be >= 1",
            ));
        }
        if !self.root_drop.is_finite() {
            return Err(PoseplayError::validation("retarget.root_drop must be finite"));
        }
        Ok(())
    }
}

/// Settings for [`crate::PoseNormalizer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizerConfig {
    /// Joints allowed to keep position data.
    #[serde(default = "default_position_joints")]
    pub position_joints: Vec<String>,
    /// Scale applied to source-space positions to keep the model near the origin.
    #[serde(default = "default_position_damping")]
    pub position_damping: f32,
    /// Component-wise bound on retained positions.
    #[serde(default = "default_max_position")]
    pub max_position: f32,
    /// Quaternions shorter than this are replaced with identity.
    #[serde(default = "default_min_rotation_magnitude")]
    pub min_rotation_magnitude: f32,
    /// Quaternions whose length differs from 1 by more than this are renormalized.
    #[serde(default = "default_rotation_tolerance")]
    pub rotation_tolerance: f32,
}

fn default_position_joints() -> Vec<String> {
    ROOT_LEVEL_JOINTS.iter().map(|j| (*j).to_owned()).collect()
}
fn default_position_damping() -> f32 {
    0.005
}
fn default_max_position() -> f32 {
    0.5
}
fn default_min_rotation_magnitude() -> f32 {
    0.1
}
fn default_rotation_tolerance() -> f32 {
    0.01
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            position_joints: default_position_joints(),
            position_damping: default_position_damping(),
            max_position: default_max_position(),
            min_rotation_magnitude: default_min_rotation_magnitude(),
            rotation_tolerance: default_rotation_tolerance(),
        }
    }
}

impl NormalizerConfig {
    /// Check value ranges.
    pub fn validate(&self) -> PoseplayResult<()> {
        if !self.position_damping.is_finite() || self.position_damping < 0.0 {
            return Err(PoseplayError::validation(
                "normalizer.position_damping must be finite and >= 0",
            ));
        }
        if !self.max_position.is_finite() || self.max_position <= 0.0 {
            return Err(PoseplayError::validation(
                "normalizer.max_position must be finite and > 0",
            ));
        }
        if !self.min_rotation_magnitude.is_finite() || self.min_rotation_magnitude < 0.0 {
            return Err(PoseplayError::validation(
                "normalizer.min_rotation_magnitude must be finite and >= 0",
            ));
        }
        if !self.rotation_tolerance.is_finite() || self.rotation_tolerance < 0.0 {
            return Err(PoseplayError::validation(
                "normalizer.rotation_tolerance must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Settings for [`crate::AnimationPlayer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerConfig {
    /// Wrap to the start on reaching the end instead of halting.
    #[serde(default = "default_true")]
    pub looping: bool,
    /// Playback speed multiplier applied to tick deltas.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            looping: true,
            speed: default_speed(),
        }
    }
}

impl PlayerConfig {
    /// Check value ranges.
    pub fn validate(&self) -> PoseplayResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(PoseplayError::validation("player.speed must be finite and > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
