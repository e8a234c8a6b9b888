use crate::foundation::error::{PoseplayError, PoseplayResult};

pub use glam::{Quat, Vec3};

/// Source image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions assumed when detector or animation metadata omits them.
    pub const DEFAULT: Self = Self {
        width: 640,
        height: 480,
    };

    /// Create validated dimensions with non-zero extents.
    pub fn new(width: u32, height: u32) -> PoseplayResult<Self> {
        if width == 0 || height == 0 {
            return Err(PoseplayError::validation(
                "dimensions width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Return `true` when both extents are non-zero.
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Validated playback rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Frame rate assumed when metadata omits it.
    pub const DEFAULT: Self = Self(30.0);

    /// Create a frame rate; it must be finite and strictly positive.
    pub fn new(fps: f64) -> PoseplayResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(PoseplayError::validation(format!(
                "frame rate must be finite and > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    /// Convert to floating-point frames per second.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / self.0
    }

    /// Convert a frame count (or index) to seconds.
    pub fn frames_to_secs(self, frames: usize) -> f64 {
        frames as f64 / self.0
    }

    /// Convert seconds to a frame index using floor semantics; negative time maps to 0.
    pub fn secs_to_frame_floor(self, secs: f64) -> usize {
        (secs * self.0).floor().max(0.0) as usize
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
