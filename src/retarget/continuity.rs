use std::collections::BTreeMap;

use crate::foundation::core::Quat;
use crate::foundation::math::align_hemisphere;
use crate::pose::model::AnimationFrame;

/// Keep every joint's rotation in the hemisphere of its previous keyed value.
///
/// Walks frames in order and negates a quaternion whose dot product with the same joint's
/// last rotation is negative. Rotations are unchanged as orientations; only the sign of the
/// representation flips. Returns the number of flipped quaternions.
pub fn fix_rotation_discontinuities(frames: &mut [AnimationFrame]) -> usize {
    let mut previous: BTreeMap<String, Quat> = BTreeMap::new();
    let mut flips = 0;
    for frame in frames.iter_mut() {
        for (name, joint) in frame.pose.iter_mut() {
            let Some(rotation) = joint.rotation.as_mut() else {
                continue;
            };
            if let Some(&prev) = previous.get(name) {
                let aligned = align_hemisphere(prev, *rotation);
                if aligned != *rotation {
                    *rotation = aligned;
                    flips += 1;
                }
            }
            previous.insert(name.to_owned(), *rotation);
        }
    }
    if flips > 0 {
        tracing::debug!(flips, "rotation sign discontinuities fixed");
    }
    flips
}

#[cfg(test)]
#[path = "../../tests/unit/retarget/continuity.rs"]
mod tests;
