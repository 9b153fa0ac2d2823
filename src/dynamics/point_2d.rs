use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::loads::wind_to_earth;
use super::{fields, Dynamics, Loads, MassProperties, PointMass3DCartesian};
use crate::optimization::Scalar;
use crate::utils::VariableBindingError;

/// Point mass moving in the vertical (north, down) plane, velocity in
/// earth axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct PointMass2DCartesian<T = f64> {
    pub x_e: T,
    pub z_e: T,
    pub u_e: T,
    pub w_e: T,
}

impl<T: Scalar> PointMass2DCartesian<T> {
    pub fn new(x_e: T, z_e: T, u_e: T, w_e: T) -> Self {
        Self { x_e, z_e, u_e, w_e }
    }

    /// Flight path angle, positive climbing, over the full circle.
    pub fn gamma(&self) -> T {
        (-self.w_e).atan2(self.u_e)
    }
}

impl<T: Scalar> Dynamics<T> for PointMass2DCartesian<T> {
    const STATE_NAMES: &'static [&'static str] = &["x_e", "z_e", "u_e", "w_e"];

    fn state(&self) -> Vec<T> {
        vec![self.x_e, self.z_e, self.u_e, self.w_e]
    }

    fn from_state(values: &[T]) -> Result<Self, VariableBindingError> {
        let [x_e, z_e, u_e, w_e] = fields(values)?;
        Ok(Self::new(x_e, z_e, u_e, w_e))
    }

    fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self {
        let wind = wind_to_earth(self.gamma(), T::zero());
        let force = loads.net_force_earth(&wind, &wind);
        Self {
            x_e: self.u_e,
            z_e: self.w_e,
            u_e: force.x / mass.mass,
            w_e: force.z / mass.mass,
        }
    }

    fn to_inertial(&self) -> PointMass3DCartesian<T> {
        PointMass3DCartesian::new(
            Vector3::new(self.x_e, T::zero(), self.z_e),
            Vector3::new(self.u_e, T::zero(), self.w_e),
        )
    }

    fn from_inertial(inertial: &PointMass3DCartesian<T>) -> Self {
        Self::new(inertial.x_e, inertial.z_e, inertial.u_e, inertial.w_e)
    }
}

/// Point mass in the vertical plane described by its speed and flight
/// path angle (radians, positive climbing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct PointMass2DSpeedGamma<T = f64> {
    pub x_e: T,
    pub z_e: T,
    pub speed: T,
    pub gamma: T,
}

impl<T: Scalar> PointMass2DSpeedGamma<T> {
    pub fn new(x_e: T, z_e: T, speed: T, gamma: T) -> Self {
        Self {
            x_e,
            z_e,
            speed,
            gamma,
        }
    }
}

impl<T: Scalar> Dynamics<T> for PointMass2DSpeedGamma<T> {
    const STATE_NAMES: &'static [&'static str] = &["x_e", "z_e", "speed", "gamma"];

    fn state(&self) -> Vec<T> {
        vec![self.x_e, self.z_e, self.speed, self.gamma]
    }

    fn from_state(values: &[T]) -> Result<Self, VariableBindingError> {
        let [x_e, z_e, speed, gamma] = fields(values)?;
        Ok(Self::new(x_e, z_e, speed, gamma))
    }

    /// Rates of every field. The flight path angle rate is undefined at
    /// zero speed.
    fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self {
        let wind = wind_to_earth(self.gamma, T::zero());
        let force = wind.transpose() * loads.net_force_earth(&wind, &wind);
        Self {
            x_e: self.speed * self.gamma.cos(),
            z_e: -self.speed * self.gamma.sin(),
            speed: force.x / mass.mass,
            gamma: -force.z / (mass.mass * self.speed),
        }
    }

    fn to_inertial(&self) -> PointMass3DCartesian<T> {
        PointMass3DCartesian::new(
            Vector3::new(self.x_e, T::zero(), self.z_e),
            Vector3::new(
                self.speed * self.gamma.cos(),
                T::zero(),
                -self.speed * self.gamma.sin(),
            ),
        )
    }

    /// Keeps only the in-plane part of the velocity.
    fn from_inertial(inertial: &PointMass3DCartesian<T>) -> Self {
        let planar = PointMass2DCartesian::from_inertial(inertial);
        Self::new(
            planar.x_e,
            planar.z_e,
            (planar.u_e * planar.u_e + planar.w_e * planar.w_e).sqrt(),
            planar.gamma(),
        )
    }
}
