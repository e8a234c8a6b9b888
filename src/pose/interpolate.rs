use crate::foundation::core::{Quat, Vec3};
use crate::pose::model::{JointPose, Pose};

/// Blends two poses by a factor in `[0, 1]`.
///
/// Positions are linearly interpolated and rotations are slerped along the shortest arc.
/// A joint present in only one pose passes through unchanged; a joint present in neither
/// stays absent.
pub struct PoseInterpolator;

impl PoseInterpolator {
    /// Blend `a` toward `b`; `alpha` is clamped to `[0, 1]` and NaN is treated as 0.
    pub fn interpolate(a: &Pose, b: &Pose, alpha: f32) -> Pose {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };

        let mut out = Pose::in_space(a.space());
        for (name, ja) in a.iter() {
            let blended = match b.get(name) {
                Some(jb) => JointPose {
                    position: blend_part(ja.position, jb.position, alpha, lerp_position),
                    rotation: blend_part(ja.rotation, jb.rotation, alpha, slerp_rotation),
                },
                None => *ja,
            };
            out.insert(name, blended);
        }
        for (name, jb) in b.iter() {
            if !a.contains(name) {
                out.insert(name, *jb);
            }
        }
        out
    }
}

fn blend_part<T: Copy>(a: Option<T>, b: Option<T>, alpha: f32, f: fn(T, T, f32) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b, alpha)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// Per-axis `a + (b - a) * alpha`.
pub fn lerp_position(a: Vec3, b: Vec3, alpha: f32) -> Vec3 {
    if !a.is_finite() || !b.is_finite() {
        return a;
    }
    a + (b - a) * alpha
}

/// Shortest-arc spherical interpolation between two rotations.
///
/// Exact endpoints are returned unchanged at `alpha == 0` and `alpha == 1`. Non-finite or
/// zero-length inputs are passed through untouched so the normalizer can repair them.
pub fn slerp_rotation(a: Quat, b: Quat, alpha: f32) -> Quat {
    if alpha <= 0.0 {
        return a;
    }
    if alpha >= 1.0 {
        return b;
    }
    if !a.is_finite() || !b.is_finite() {
        return a;
    }
    let (la, lb) = (a.length(), b.length());
    if la <= f32::EPSILON || lb <= f32::EPSILON {
        return a;
    }
    (a / la).slerp(b / lb, alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/pose/interpolate.rs"]
mod tests;
