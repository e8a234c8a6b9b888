use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::pose::interpolate::PoseInterpolator;
use crate::pose::model::{Animation, Pose};

/// Sample `animation` at `t` seconds, blending the two frames that bracket `t`.
///
/// `t` is clamped to `[0, duration]` first (NaN reads as 0), so sampling before the start
/// equals sampling at 0 and sampling past the end equals sampling at `duration`. With
/// `fr` the frame rate:
///
/// - `frame = clamp(floor(t * fr), 0, len - 1)`
/// - `next = min(frame + 1, len - 1)`
/// - `alpha = (t - frame / fr) * fr`, clamped to `[0, 1]`
///
/// The returned pose is raw interpolated source data; [`crate::PoseNormalizer`] is applied
/// by the player before the pose reaches a sink.
///
/// Fails on animations with no frames or a non-positive frame rate.
pub fn sample_at_time(animation: &Animation, t: f64) -> PoseplayResult<Pose> {
    if animation.frames.is_empty() {
        return Err(PoseplayError::sampling(format!(
            "animation '{}' has no frames",
            animation.name()
        )));
    }
    let fr = animation
        .frame_rate()
        .map_err(|e| PoseplayError::sampling(e.to_string()))?;

    let last = animation.frames.len() - 1;
    let t = clamp_time(t, fr.frames_to_secs(animation.frames.len()));
    let frame = fr.secs_to_frame_floor(t).min(last);
    let next = (frame + 1).min(last);
    let alpha = ((t - fr.frames_to_secs(frame)) * fr.as_f64()).clamp(0.0, 1.0) as f32;

    Ok(PoseInterpolator::interpolate(
        &animation.frames[frame].pose,
        &animation.frames[next].pose,
        alpha,
    ))
}

/// Clamp a sample time into `[0, duration]`; NaN maps to 0.
pub fn clamp_time(t: f64, duration: f64) -> f64 {
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, duration.max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sample.rs"]
mod tests;
