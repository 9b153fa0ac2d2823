use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::optimization::Scalar;
use crate::utils::{deg_to_rad, SEA_LEVEL_DENSITY};

/// Free-stream condition an airplane is analyzed at.
///
/// Angles are in degrees, rates in rad/s about body axes (x forward,
/// y starboard, z down). Every field may carry a bound variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    bound(
        serialize = "T: Scalar + Serialize",
        deserialize = "T: Scalar + Deserialize<'de>"
    )
)]
pub struct OperatingPoint<T = f64> {
    /// True airspeed (m/s)
    pub velocity: T,
    /// Angle of attack (deg)
    pub alpha: T,
    /// Sideslip angle (deg), positive with the wind from starboard
    pub beta: T,
    /// Roll rate (rad/s)
    pub p: T,
    /// Pitch rate (rad/s)
    pub q: T,
    /// Yaw rate (rad/s)
    pub r: T,
    /// Air density (kg/m^3)
    pub density: T,
}

/// Unit airspeed at sea-level density with the flow along the body x axis.
///
/// Coefficients from the vortex lattice do not depend on airspeed, so the
/// unit default is enough for coefficient studies. Dimensional loads scale
/// with the square of `velocity` and need it set explicitly. Fields missing
/// from a deserialized record take these values.
impl<T: Scalar> Default for OperatingPoint<T> {
    fn default() -> Self {
        Self {
            velocity: T::one(),
            alpha: T::zero(),
            beta: T::zero(),
            p: T::zero(),
            q: T::zero(),
            r: T::zero(),
            density: T::from_f64(SEA_LEVEL_DENSITY),
        }
    }
}

impl<T: Scalar> OperatingPoint<T> {
    pub fn new(velocity: T, alpha: T, beta: T) -> Self {
        Self {
            velocity,
            alpha,
            beta,
            ..Default::default()
        }
    }

    pub fn with_rates(mut self, p: T, q: T, r: T) -> Self {
        self.p = p;
        self.q = q;
        self.r = r;
        self
    }

    pub fn with_density(mut self, density: T) -> Self {
        self.density = density;
        self
    }

    pub fn dynamic_pressure(&self) -> T {
        self.density * self.velocity * self.velocity * 0.5
    }

    /// Unit vector the air moves along, in geometry axes (x aft, y
    /// starboard, z up). Also the direction of drag.
    pub fn freestream_direction(&self) -> Vector3<T> {
        let (alpha, beta) = (deg_to_rad(self.alpha), deg_to_rad(self.beta));
        Vector3::new(
            alpha.cos() * beta.cos(),
            -beta.sin(),
            alpha.sin() * beta.cos(),
        )
    }

    /// Direction of lift in geometry axes.
    pub fn lift_direction(&self) -> Vector3<T> {
        let alpha = deg_to_rad(self.alpha);
        Vector3::new(-alpha.sin(), T::zero(), alpha.cos())
    }

    /// Direction of side force (positive to starboard) in geometry axes.
    pub fn side_direction(&self) -> Vector3<T> {
        self.lift_direction().cross(&self.freestream_direction())
    }

    /// Body angular rates expressed in geometry axes.
    pub fn rotation_rates(&self) -> Vector3<T> {
        Vector3::new(-self.p, self.q, -self.r)
    }

    /// Local air velocity at `point` seen by an airplane rotating about
    /// `reference`.
    pub fn freestream_velocity_at(&self, point: &Vector3<T>, reference: &Vector3<T>) -> Vector3<T> {
        let rotation = self.rotation_rates().cross(&(point - reference));
        self.freestream_direction() * self.velocity - rotation
    }
}

impl OperatingPoint<f64> {
    pub fn lift<U: Scalar>(&self) -> OperatingPoint<U> {
        OperatingPoint {
            velocity: U::from_f64(self.velocity),
            alpha: U::from_f64(self.alpha),
            beta: U::from_f64(self.beta),
            p: U::from_f64(self.p),
            q: U::from_f64(self.q),
            r: U::from_f64(self.r),
            density: U::from_f64(self.density),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_fields_take_unit_airspeed() {
        let op: OperatingPoint = serde_yaml::from_str("alpha: 4.0\n").unwrap();
        assert_eq!(op.velocity, 1.0);
        assert_eq!(op.alpha, 4.0);
        assert_eq!(op.density, SEA_LEVEL_DENSITY);
        assert_relative_eq!(op.dynamic_pressure(), 0.5 * SEA_LEVEL_DENSITY);
    }

    #[test]
    fn test_dynamic_pressure() {
        let op = OperatingPoint::new(10.0, 5.0, 0.0);
        assert_relative_eq!(op.dynamic_pressure(), 61.25);
    }

    #[test]
    fn test_force_directions_are_orthonormal() {
        let op = OperatingPoint::new(10.0, 7.0, -4.0);
        let (d, l, s) = (
            op.freestream_direction(),
            op.lift_direction(),
            op.side_direction(),
        );
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(l.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.dot(&l), 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.dot(&s), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_positive_alpha_flows_upwards() {
        let op = OperatingPoint::new(1.0, 10.0, 0.0);
        assert!(op.freestream_direction().z > 0.0);
        assert_relative_eq!(op.side_direction(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_pitch_rate_adds_upwash_at_tail() {
        // Nose-up pitch moves the tail down, so the air meets it from below
        let op = OperatingPoint::new(10.0, 0.0, 0.0).with_rates(0.0, 1.0, 0.0);
        let tail = Vector3::new(2.0, 0.0, 0.0);
        let velocity = op.freestream_velocity_at(&tail, &Vector3::zeros());
        assert_relative_eq!(velocity, Vector3::new(10.0, 0.0, 2.0), epsilon = 1e-12);
    }
}
