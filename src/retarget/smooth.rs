use std::collections::VecDeque;

use crate::retarget::keypoint::{Keypoint, KeypointSet};

/// Confidence- and recency-weighted moving average over recent keypoint frames.
///
/// Only pixel coordinates are averaged; each output keypoint keeps the confidence it had in
/// the current frame. History holds raw input so smoothing never feeds back on itself.
#[derive(Clone, Debug)]
pub struct KeypointSmoother {
    window: usize,
    history: VecDeque<KeypointSet>,
}

impl KeypointSmoother {
    /// Smoother averaging over `window` frames (clamped to at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Window length in frames.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Frames currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Return `true` when no frame has been seen since the last clear.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Push `current` and return its smoothed counterpart.
    pub fn smooth(&mut self, current: &KeypointSet) -> KeypointSet {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(current.clone());

        let mut out = KeypointSet::default();
        for kp in current.iter() {
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            let mut total = 0.0f32;
            for (rank, frame) in self.history.iter().enumerate() {
                let Some(past) = frame.get(&kp.name) else {
                    continue;
                };
                let weight = past.confidence.max(0.0) * (rank as f32 + 1.0);
                sum_x += past.x * weight;
                sum_y += past.y * weight;
                total += weight;
            }
            let (x, y) = if total > f32::EPSILON {
                (sum_x / total, sum_y / total)
            } else {
                (kp.x, kp.y)
            };
            out.replace(Keypoint::new(kp.name.clone(), x, y, kp.confidence));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/retarget/smooth.rs"]
mod tests;
