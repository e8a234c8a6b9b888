//! Poseplay retargets 2D pose-detector keypoints onto a fixed humanoid skeleton and plays the
//! resulting animations back through a pose consumer.
//!
//! # Pipeline overview
//!
//! 1. **Retarget**: detector keypoints -> [`Animation`] ([`PoseRetargeter::process_sequence`])
//! 2. **Sample**: `Animation + t` -> interpolated [`Pose`] ([`sample_at_time`])
//! 3. **Normalize**: raw pose -> model-safe pose ([`PoseNormalizer`])
//! 4. **Apply**: pose -> consumer ([`PoseSink`], e.g. [`SkeletonKinematics`])
//!
//! [`AnimationPlayer`] drives steps 2-4 from a per-frame tick. Animations are exchanged as JSON
//! through [`import_animation_json`] and [`export_animation_json`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in the pipeline**: retargeting, sampling and playback work on in-memory values;
//!   only [`PoseplayConfig::load`] reads a file.
//! - **Tolerant input**: malformed frames, joints and keypoints are skipped and logged through
//!   `tracing`; only unusable whole documents and degenerate animations are errors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod interchange;
mod playback;
mod pose;
mod retarget;
mod skeleton;

/// Procedural demo animations.
pub mod synth;

pub use config::{NormalizerConfig, PlayerConfig, PoseplayConfig, RetargetConfig};
pub use foundation::core::{Dimensions, FrameRate, Quat, Vec3};
pub use foundation::error::{PoseplayError, PoseplayResult};
pub use interchange::json::{
    DEFAULT_IMPORT_NAME, export_animation_json, import_animation_json, parse_detector_json,
};
pub use playback::player::{AnimationPlayer, PlaybackState};
pub use playback::sample::{clamp_time, sample_at_time};
pub use playback::sink::{PoseSink, RecordingSink};
pub use pose::interpolate::{PoseInterpolator, lerp_position, slerp_rotation};
pub use pose::model::{
    Animation, AnimationFrame, AnimationMetadata, DURATION_TOLERANCE_SECS, JointPose, Pose,
    PoseSpace,
};
pub use pose::normalize::PoseNormalizer;
pub use retarget::continuity::fix_rotation_discontinuities;
pub use retarget::keypoint::{
    DetectionFrame, DetectorInput, DetectorMetadata, Keypoint, KeypointSet, ResolvedMetadata,
};
pub use retarget::mapper::{BoneAxis, PoseRetargeter};
pub use retarget::smooth::KeypointSmoother;
pub use skeleton::definition::{
    AngleRange, JointDefinition, JointLimits, KeypointMapping, ROOT_LEVEL_JOINTS,
    SkeletonDefinition, joint,
};
pub use skeleton::kinematics::{JointState, SkeletonKinematics};
