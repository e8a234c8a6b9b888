use crate::foundation::core::{Quat, Vec3};

/// Flip `q` into the same hemisphere as `reference`.
///
/// `q` and `-q` encode the same rotation, so the result is equivalent to `q`.
pub(crate) fn align_hemisphere(reference: Quat, q: Quat) -> Quat {
    if reference.dot(q) < 0.0 { -q } else { q }
}

pub(crate) fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// `a * weight_a + b * (1 - weight_a)`.
pub(crate) fn blend(a: Vec3, weight_a: f32, b: Vec3) -> Vec3 {
    a * weight_a + b * (1.0 - weight_a)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
