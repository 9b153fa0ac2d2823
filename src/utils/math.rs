use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::optimization::Scalar;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad<T: Scalar>(deg: T) -> T {
    deg * (PI / 180.0)
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg<T: Scalar>(rad: T) -> T {
    rad * (180.0 / PI)
}

/// Linear interpolation between two values. `factor` is not clamped.
#[inline]
pub fn lerp<T: Scalar>(start: T, end: T, factor: f64) -> T {
    start + (end - start) * factor
}

/// Component-wise linear interpolation between two points.
pub fn lerp_vector<T: Scalar>(start: &Vector3<T>, end: &Vector3<T>, factor: f64) -> Vector3<T> {
    Vector3::new(
        lerp(start.x, end.x, factor),
        lerp(start.y, end.y, factor),
        lerp(start.z, end.z, factor),
    )
}

/// `n` evenly spaced samples on `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// `n` cosine-spaced samples on `[start, end]`, clustered towards both ends.
pub fn cosspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let mean = (start + end) / 2.0;
    let amplitude = (end - start) / 2.0;
    linspace(PI, 0.0, n)
        .into_iter()
        .map(|theta| mean + amplitude * theta.cos())
        .collect()
}

/// Euclidean norm of a vector of scalars.
#[inline]
pub fn norm<T: Scalar>(v: &Vector3<T>) -> T {
    v.dot(v).sqrt()
}

/// Unit vector along `v`.
#[inline]
pub fn normalize<T: Scalar>(v: &Vector3<T>) -> Vector3<T> {
    v / norm(v)
}

/// Lift a plain `f64` vector into any scalar type.
#[inline]
pub fn vector_from_f64<T: Scalar>(v: &Vector3<f64>) -> Vector3<T> {
    v.map(T::from_f64)
}

/// Primal part of a vector of scalars.
#[inline]
pub fn vector_value<T: Scalar>(v: &Vector3<T>) -> Vector3<f64> {
    v.map(|x| x.value())
}

/// Approximates `1 / x`, going smoothly to zero as `x -> 0` instead of diverging.
#[inline]
pub fn smoothed_inv<T: Scalar>(x: T, epsilon: f64) -> T {
    x / (x * x + epsilon)
}

/// Flight path angle (positive climbing) from an earth-axes velocity, z down.
pub fn flight_path_angle<T: Scalar>(velocity: &Vector3<T>) -> T {
    (-velocity.z).atan2((velocity.x * velocity.x + velocity.y * velocity.y).sqrt())
}

/// Ground track angle from an earth-axes velocity.
pub fn heading_from_velocity<T: Scalar>(velocity: &Vector3<T>) -> T {
    velocity.y.atan2(velocity.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cosspace_clusters_at_ends() {
        let samples = cosspace(0.0, 1.0, 5);
        assert_eq!(samples.len(), 5);
        assert_relative_eq!(samples[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(samples[2], 0.5, epsilon = 1e-15);
        assert_relative_eq!(samples[4], 1.0, epsilon = 1e-15);
        assert!(samples[1] - samples[0] < samples[2] - samples[1]);
    }

    #[test]
    fn test_smoothed_inv() {
        assert_relative_eq!(smoothed_inv(2.0, 1e-8), 0.5, epsilon = 1e-8);
        assert_eq!(smoothed_inv(0.0, 1e-8), 0.0);
    }

    #[test]
    fn test_flight_path_angle() {
        let climbing = Vector3::new(10.0, 0.0, -10.0);
        assert_relative_eq!(flight_path_angle(&climbing), PI / 4.0, epsilon = 1e-12);
        assert_relative_eq!(
            heading_from_velocity(&Vector3::new(0.0, 5.0, 0.0)),
            PI / 2.0,
            epsilon = 1e-12
        );
    }
}
