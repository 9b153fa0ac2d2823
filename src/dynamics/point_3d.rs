use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::loads::wind_to_earth;
use super::{fields, Dynamics, Loads, MassProperties};
use crate::optimization::Scalar;
use crate::utils::{flight_path_angle, heading_from_velocity, VariableBindingError};

/// Point mass in three dimensions with position and velocity in earth
/// axes. Every other representation converts through this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct PointMass3DCartesian<T = f64> {
    pub x_e: T,
    pub y_e: T,
    pub z_e: T,
    pub u_e: T,
    pub v_e: T,
    pub w_e: T,
}

impl<T: Scalar> PointMass3DCartesian<T> {
    pub fn new(position: Vector3<T>, velocity: Vector3<T>) -> Self {
        Self {
            x_e: position.x,
            y_e: position.y,
            z_e: position.z,
            u_e: velocity.x,
            v_e: velocity.y,
            w_e: velocity.z,
        }
    }

    pub fn position(&self) -> Vector3<T> {
        Vector3::new(self.x_e, self.y_e, self.z_e)
    }

    pub fn velocity(&self) -> Vector3<T> {
        Vector3::new(self.u_e, self.v_e, self.w_e)
    }

    pub fn speed(&self) -> T {
        let velocity = self.velocity();
        velocity.dot(&velocity).sqrt()
    }

    pub fn altitude(&self) -> T {
        -self.z_e
    }
}

impl<T: Scalar> Dynamics<T> for PointMass3DCartesian<T> {
    const STATE_NAMES: &'static [&'static str] = &["x_e", "y_e", "z_e", "u_e", "v_e", "w_e"];

    fn state(&self) -> Vec<T> {
        vec![self.x_e, self.y_e, self.z_e, self.u_e, self.v_e, self.w_e]
    }

    fn from_state(values: &[T]) -> Result<Self, VariableBindingError> {
        let [x_e, y_e, z_e, u_e, v_e, w_e] = fields(values)?;
        Ok(Self {
            x_e,
            y_e,
            z_e,
            u_e,
            v_e,
            w_e,
        })
    }

    fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self {
        let velocity = self.velocity();
        let wind = wind_to_earth(flight_path_angle(&velocity), heading_from_velocity(&velocity));
        let acceleration = loads.net_force_earth(&wind, &wind) / mass.mass;
        Self::new(velocity, acceleration)
    }

    fn to_inertial(&self) -> PointMass3DCartesian<T> {
        *self
    }

    fn from_inertial(inertial: &PointMass3DCartesian<T>) -> Self {
        *inertial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::Axes;
    use approx::assert_relative_eq;

    #[test]
    fn test_drag_opposes_velocity() {
        let state = PointMass3DCartesian::new(Vector3::zeros(), Vector3::new(3.0, 4.0, 0.0));
        let mut loads = Loads::default();
        loads.add_force(Axes::Wind, Vector3::new(-10.0, 0.0, 0.0));
        let rates = state.derivative(&loads, &MassProperties::point_mass(2.0));
        assert_relative_eq!(rates.velocity(), Vector3::new(-3.0, -4.0, 0.0), epsilon = 1e-12);
        assert_eq!(rates.position(), state.velocity());
    }

    #[test]
    fn test_side_force_points_right_of_track() {
        // Flying east, starboard is south
        let state = PointMass3DCartesian::new(Vector3::zeros(), Vector3::new(0.0, 10.0, 0.0));
        let mut loads = Loads::default();
        loads.add_force(Axes::Body, Vector3::new(0.0, 1.0, 0.0));
        let rates = state.derivative(&loads, &MassProperties::point_mass(1.0));
        assert_relative_eq!(rates.velocity(), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_speed_and_altitude() {
        let state = PointMass3DCartesian::new(Vector3::new(0.0, 0.0, -120.0), Vector3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(state.speed(), 5.0);
        assert_relative_eq!(state.altitude(), 120.0);
    }
}
