use std::collections::BTreeMap;

use serde::Deserialize as _;

use crate::foundation::core::{Dimensions, FrameRate};

/// One named detector keypoint in pixel coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keypoint {
    /// Detector keypoint name, e.g. `"left_shoulder"`.
    pub name: String,
    /// Pixel column.
    pub x: f32,
    /// Pixel row (grows downward).
    pub y: f32,
    /// Detector score in `[0, 1]`.
    #[serde(default, alias = "score")]
    pub confidence: f32,
}

impl Keypoint {
    /// Create a keypoint.
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }

    /// Finite coordinates and confidence at or above `threshold`.
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.confidence >= threshold
    }
}

/// Metadata block of a detector document. Every field is optional and malformed values read
/// as absent; a metadata value that is not an object reads as all-default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct DetectorMetadata {
    /// Source image width in pixels.
    pub width: Option<f64>,
    /// Source image height in pixels.
    pub height: Option<f64>,
    /// Capture rate, read from `fps` and then from `frameRate`.
    pub fps: Option<f64>,
    /// Optional display name for the resulting animation.
    pub name: Option<String>,
}

impl<'de> serde::Deserialize<'de> for DetectorMetadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Detector metadata with defaults substituted.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMetadata {
    /// Animation name.
    pub name: String,
    /// Image dimensions (640x480 when absent).
    pub dimensions: Dimensions,
    /// Frame rate (30 fps when absent).
    pub frame_rate: FrameRate,
}

impl DetectorMetadata {
    fn from_value(value: &serde_json::Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("detector metadata is not an object; using defaults");
            }
            return Self::default();
        };
        let number = |key: &str| map.get(key).and_then(serde_json::Value::as_f64);
        Self {
            width: number("width"),
            height: number("height"),
            fps: number("fps").or_else(|| number("frameRate")),
            name: map
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
        }
    }

    /// Substitute defaults for missing or unusable fields, logging each substitution.
    pub fn resolve(&self, default_name: &str) -> ResolvedMetadata {
        let width = positive_u32(self.width).unwrap_or_else(|| {
            tracing::warn!(
                value = ?self.width,
                "detector width missing or invalid; using default"
            );
            Dimensions::DEFAULT.width
        });
        let height = positive_u32(self.height).unwrap_or_else(|| {
            tracing::warn!(
                value = ?self.height,
                "detector height missing or invalid; using default"
            );
            Dimensions::DEFAULT.height
        });
        let frame_rate = self
            .fps
            .and_then(|fps| FrameRate::new(fps).ok())
            .unwrap_or_else(|| {
                tracing::warn!(value = ?self.fps, "detector fps missing or invalid; using default");
                FrameRate::DEFAULT
            });
        ResolvedMetadata {
            name: self
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| default_name.to_owned()),
            dimensions: Dimensions { width, height },
            frame_rate,
        }
    }
}

fn positive_u32(v: Option<f64>) -> Option<u32> {
    let v = v?;
    if !v.is_finite() || v < 1.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v.round() as u32)
}

/// One detector output frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionFrame {
    /// Keypoints; `None` when the frame carried no usable keypoints array.
    #[serde(default, deserialize_with = "lenient_keypoints")]
    pub keypoints: Option<Vec<Keypoint>>,
}

/// Whole detector document: metadata plus per-frame detections.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectorInput {
    /// Capture metadata.
    #[serde(default)]
    pub metadata: DetectorMetadata,
    /// Frames in capture order. An entry that is not a frame object reads as a frame without
    /// keypoints.
    #[serde(deserialize_with = "lenient_detections")]
    pub detections: Vec<DetectionFrame>,
}

/// Keypoints of one frame keyed by name; duplicates keep the most confident instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeypointSet {
    by_name: BTreeMap<String, Keypoint>,
}

impl KeypointSet {
    /// Collect `keypoints`, dropping ones with non-finite coordinates.
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        let mut set = Self::default();
        for kp in keypoints {
            if !kp.x.is_finite() || !kp.y.is_finite() {
                tracing::debug!(keypoint = %kp.name, "non-finite keypoint dropped");
                continue;
            }
            set.insert(kp.clone());
        }
        set
    }

    /// Insert `kp` unless a more confident keypoint with the same name is present.
    pub fn insert(&mut self, kp: Keypoint) {
        match self.by_name.get(&kp.name) {
            Some(existing) if existing.confidence >= kp.confidence => {}
            _ => {
                self.by_name.insert(kp.name.clone(), kp);
            }
        }
    }

    /// Replace the entry for `kp.name` unconditionally.
    pub fn replace(&mut self, kp: Keypoint) {
        self.by_name.insert(kp.name.clone(), kp);
    }

    /// Keypoint named `name`.
    pub fn get(&self, name: &str) -> Option<&Keypoint> {
        self.by_name.get(name)
    }

    /// Keypoint named `name` if it passes `threshold`.
    pub fn confident(&self, name: &str, threshold: f32) -> Option<&Keypoint> {
        self.get(name).filter(|kp| kp.is_valid(threshold))
    }

    /// Keypoints in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.by_name.values()
    }

    /// Number of distinct keypoint names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Return `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn lenient_detections<'de, D>(deserializer: D) -> Result<Vec<DetectionFrame>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<DetectionFrame>(item).unwrap_or_else(|e| {
                tracing::warn!(frame = index, error = %e, "malformed detection frame");
                DetectionFrame::default()
            })
        })
        .collect())
}

fn lenient_keypoints<'de, D>(deserializer: D) -> Result<Option<Vec<Keypoint>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };
    let mut keypoints = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Keypoint>(item) {
            Ok(kp) => keypoints.push(kp),
            Err(e) => tracing::warn!(error = %e, "malformed keypoint skipped"),
        }
    }
    Ok(Some(keypoints))
}

#[cfg(test)]
#[path = "../../tests/unit/retarget/keypoint.rs"]
mod tests;
