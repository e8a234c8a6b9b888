//! Deterministic procedural animations for demos and tests.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Dimensions, FrameRate, Quat, Vec3};
use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::pose::model::{Animation, AnimationFrame, Pose};
use crate::skeleton::definition::joint;

/// Built-in procedural motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntheticKind {
    /// Standing still with breathing and a slow look-around.
    Idle,
    /// Right arm raised, forearm waving.
    Wave,
    /// In-place walk cycle.
    Walk,
}

impl SyntheticKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Idle, Self::Wave, Self::Walk];

    /// Lowercase name used on the command line and in animation names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Wave => "wave",
            Self::Walk => "walk",
        }
    }
}

impl fmt::Display for SyntheticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyntheticKind {
    type Err = PoseplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PoseplayError::validation(format!(
                    "unknown synthetic animation '{s}' (expected idle, wave or walk)"
                ))
            })
    }
}

/// Generate `frames` frames of `kind` at `frame_rate`.
pub fn generate(
    kind: SyntheticKind,
    frames: usize,
    frame_rate: FrameRate,
) -> PoseplayResult<Animation> {
    match kind {
        SyntheticKind::Idle => idle(frames, frame_rate),
        SyntheticKind::Wave => wave(frames, frame_rate),
        SyntheticKind::Walk => walk(frames, frame_rate),
    }
}

/// Breathing spine and chest with a slow head turn.
pub fn idle(frames: usize, frame_rate: FrameRate) -> PoseplayResult<Animation> {
    build(SyntheticKind::Idle, frames, frame_rate, |t| {
        let mut pose = Pose::new();
        pose.set_position(joint::HIPS, Vec3::ZERO);
        pose.set_rotation(joint::SPINE, Quat::from_rotation_x(sine(0.03, 0.25, 0.0, t)));
        pose.set_rotation(joint::CHEST, Quat::from_rotation_x(sine(0.02, 0.25, 0.5, t)));
        pose.set_rotation(joint::HEAD, Quat::from_rotation_y(sine(0.15, 0.1, 0.0, t)));
        pose
    })
}

/// Right upper arm held up while the forearm swings side to side.
pub fn wave(frames: usize, frame_rate: FrameRate) -> PoseplayResult<Animation> {
    build(SyntheticKind::Wave, frames, frame_rate, |t| {
        let mut pose = Pose::new();
        pose.set_rotation(joint::RIGHT_UPPER_ARM, Quat::from_rotation_z(-1.2));
        pose.set_rotation(
            joint::RIGHT_LOWER_ARM,
            Quat::from_rotation_z(-0.3 + sine(0.4, 1.5, 0.0, t)),
        );
        pose.set_rotation(joint::HEAD, Quat::from_rotation_z(sine(0.05, 0.75, 0.25, t)));
        pose
    })
}

/// One stride per second: legs in antiphase, arms countering, hips bobbing twice per cycle.
pub fn walk(frames: usize, frame_rate: FrameRate) -> PoseplayResult<Animation> {
    build(SyntheticKind::Walk, frames, frame_rate, |t| {
        let mut pose = Pose::new();
        pose.set_position(joint::HIPS, Vec3::new(0.0, sine(0.02, 2.0, 0.0, t), 0.0));
        pose.set_rotation(joint::HIPS, Quat::from_rotation_y(sine(0.1, 1.0, 0.0, t)));

        for (upper, lower, phase) in [
            (joint::LEFT_UPPER_LEG, joint::LEFT_LOWER_LEG, 0.0),
            (joint::RIGHT_UPPER_LEG, joint::RIGHT_LOWER_LEG, 0.5),
        ] {
            pose.set_rotation(upper, Quat::from_rotation_x(sine(0.5, 1.0, phase, t)));
            let bend = sine(0.6, 1.0, phase + 0.25, t).max(0.0);
            pose.set_rotation(lower, Quat::from_rotation_x(bend));
        }
        for (arm, phase) in [(joint::LEFT_UPPER_ARM, 0.5), (joint::RIGHT_UPPER_ARM, 0.0)] {
            pose.set_rotation(arm, Quat::from_rotation_x(sine(0.3, 1.0, phase, t)));
        }
        pose
    })
}

fn build(
    kind: SyntheticKind,
    frames: usize,
    frame_rate: FrameRate,
    pose_at: impl Fn(f32) -> Pose,
) -> PoseplayResult<Animation> {
    if frames == 0 {
        return Err(PoseplayError::validation(
            "synthetic animation needs at least one frame",
        ));
    }
    let frames = (0..frames)
        .map(|i| {
            let t = frame_rate.frames_to_secs(i) as f32;
            AnimationFrame::at(i, frame_rate, pose_at(t))
        })
        .collect();
    Ok(Animation::new(
        format!("synthetic {kind}"),
        frame_rate,
        Dimensions::DEFAULT,
        frames,
    ))
}

/// `amp * sin(2π (freq_hz * t + phase))`, with `phase` in cycles.
fn sine(amp: f32, freq_hz: f32, phase: f32, t: f32) -> f32 {
    amp * (TAU * (freq_hz * t + phase)).sin()
}

#[cfg(test)]
#[path = "../tests/unit/synth.rs"]
mod tests;
