use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::optimization::Scalar;
use crate::utils::{norm, smoothed_inv};

/// Velocity induced at `point` by a horseshoe vortex of strength `gamma`:
/// a bound leg from `left` to `right` and two semi-infinite trailing legs
/// leaving its ends along `trailing_direction`.
///
/// Every reciprocal goes through [`smoothed_inv`], so points on or near a
/// leg see a finite, continuous velocity instead of a singularity. Distances
/// are measured in bound-leg lengths before smoothing, which makes `epsilon`
/// relative to the panel size and the result independent of model scale.
pub fn horseshoe_induced_velocity<T: Scalar>(
    point: &Vector3<T>,
    left: &Vector3<T>,
    right: &Vector3<T>,
    trailing_direction: &Vector3<T>,
    gamma: T,
    epsilon: f64,
) -> Vector3<T> {
    let span = norm(&(right - left));
    // The trailing legs of a zero-width horseshoe cancel
    if span.value() <= 0.0 {
        return Vector3::zeros();
    }
    let a = (point - left) / span;
    let b = (point - right) / span;
    let u = trailing_direction;

    let norm_a = norm(&a);
    let norm_b = norm(&b);
    let norm_a_inv = smoothed_inv(norm_a, epsilon);
    let norm_b_inv = smoothed_inv(norm_b, epsilon);

    let bound = (norm_a_inv + norm_b_inv) * smoothed_inv(norm_a * norm_b + a.dot(&b), epsilon);
    let trailing_left = norm_a_inv * smoothed_inv(norm_a - a.dot(u), epsilon);
    let trailing_right = norm_b_inv * smoothed_inv(norm_b - b.dot(u), epsilon);

    (a.cross(&b) * bound + a.cross(u) * trailing_left - b.cross(u) * trailing_right)
        * (gamma / span / (4.0 * PI))
}
