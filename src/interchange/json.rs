use serde_json::{Map, Value};

use crate::foundation::core::{Dimensions, FrameRate};
use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::pose::model::{Animation, AnimationFrame, JointPose, Pose};
use crate::retarget::keypoint::DetectorInput;

/// Name given to imported animations whose metadata has none.
pub const DEFAULT_IMPORT_NAME: &str = "Imported Animation";

/// Parse an animation interchange document.
///
/// The document must be an object with a `frames` list; anything else is a validation
/// error. Missing or malformed metadata falls back to 30 fps and 640x480, while an explicit
/// non-positive `frameRate` is rejected. Frames and joints that fail to parse are skipped
/// with a warning; a missing `frameIndex`/`timestamp` is derived from the frame's position.
/// `frameCount` and `duration` are always recomputed from the frames that survive.
///
/// `{"frames": []}` imports successfully as an animation with zero frames, which
/// [`Animation::is_playable`] reports as not playable.
#[tracing::instrument(skip(json), fields(bytes = json.len()))]
pub fn import_animation_json(json: &str) -> PoseplayResult<Animation> {
    let doc: Value = serde_json::from_str(json)?;
    let Value::Object(root) = doc else {
        return Err(PoseplayError::validation(
            "animation document must be a JSON object",
        ));
    };
    let raw_frames = match root.get("frames") {
        Some(Value::Array(frames)) => frames,
        Some(_) => {
            return Err(PoseplayError::validation(
                "animation 'frames' must be a list",
            ));
        }
        None => {
            return Err(PoseplayError::validation(
                "animation document has no 'frames' list",
            ));
        }
    };

    let metadata = root.get("metadata").and_then(Value::as_object);
    if metadata.is_none() {
        tracing::warn!("animation metadata missing; using defaults");
    }
    let frame_rate = read_frame_rate(metadata)?;
    let dimensions = read_dimensions(metadata);
    let name = metadata
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_IMPORT_NAME)
        .to_owned();

    let mut frames = Vec::with_capacity(raw_frames.len());
    for (position, raw) in raw_frames.iter().enumerate() {
        match read_frame(position, raw, frame_rate) {
            Some(frame) => frames.push(frame),
            None => tracing::warn!(frame = position, "malformed animation frame skipped"),
        }
    }

    if let Some(count) = metadata
        .and_then(|m| m.get("frameCount"))
        .and_then(Value::as_u64)
        && count != frames.len() as u64
    {
        tracing::debug!(declared = count, actual = frames.len(), "frameCount recomputed");
    }

    let animation = Animation::new(name, frame_rate, dimensions, frames);
    tracing::info!(
        animation = animation.name(),
        frames = animation.len(),
        "animation imported"
    );
    Ok(animation)
}

/// Serialize `animation` to pretty-printed interchange JSON after validating its metadata.
pub fn export_animation_json(animation: &Animation) -> PoseplayResult<String> {
    animation.validate()?;
    Ok(serde_json::to_string_pretty(animation)?)
}

/// Parse a detector document (`metadata` + `detections`).
///
/// A missing or non-list `detections` field is a validation error; individual frames and
/// keypoints are read leniently.
pub fn parse_detector_json(json: &str) -> PoseplayResult<DetectorInput> {
    let doc: Value = serde_json::from_str(json)?;
    match doc.get("detections") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(PoseplayError::validation(
                "detector 'detections' must be a list",
            ));
        }
        None => {
            return Err(PoseplayError::validation(
                "detector document has no 'detections' list",
            ));
        }
    }
    let input: DetectorInput = serde_json::from_value(doc)?;
    tracing::debug!(detections = input.detections.len(), "detector document parsed");
    Ok(input)
}

fn read_frame_rate(metadata: Option<&Map<String, Value>>) -> PoseplayResult<FrameRate> {
    match metadata.and_then(|m| m.get("frameRate")) {
        None | Some(Value::Null) => Ok(FrameRate::DEFAULT),
        Some(Value::Number(n)) => {
            let fps = n.as_f64().unwrap_or(f64::NAN);
            FrameRate::new(fps).map_err(|_| {
                PoseplayError::validation(format!("animation frameRate must be > 0, got {n}"))
            })
        }
        Some(other) => {
            tracing::warn!(value = %other, "animation frameRate is not a number; using default");
            Ok(FrameRate::DEFAULT)
        }
    }
}

fn read_dimensions(metadata: Option<&Map<String, Value>>) -> Dimensions {
    let dims = metadata
        .and_then(|m| m.get("dimensions"))
        .and_then(Value::as_object);
    let extent = |key: &str, default: u32| {
        dims.and_then(|d| d.get(key))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(default)
    };
    Dimensions {
        width: extent("width", Dimensions::DEFAULT.width),
        height: extent("height", Dimensions::DEFAULT.height),
    }
}

fn read_frame(position: usize, raw: &Value, frame_rate: FrameRate) -> Option<AnimationFrame> {
    let object = raw.as_object()?;
    let frame_index = object
        .get("frameIndex")
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(position);
    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_f64)
        .filter(|t| t.is_finite())
        .unwrap_or_else(|| frame_rate.frames_to_secs(frame_index));

    let mut pose = Pose::new();
    match object.get("joints") {
        Some(Value::Object(joints)) => {
            for (name, value) in joints {
                match serde_json::from_value::<JointPose>(value.clone()) {
                    Ok(joint) if !joint.is_empty() => pose.insert(name.clone(), joint),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(
                            frame = position,
                            joint = %name,
                            error = %e,
                            "malformed joint skipped"
                        );
                    }
                }
            }
        }
        None | Some(Value::Null) => {}
        Some(_) => return None,
    }

    Some(AnimationFrame {
        frame_index,
        timestamp,
        pose,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/interchange/json.rs"]
mod tests;
