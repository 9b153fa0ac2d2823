use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::loads::{body_to_earth, wind_to_body};
use super::{fields, Dynamics, Loads, MassProperties, PointMass3DCartesian};
use crate::optimization::Scalar;
use crate::utils::VariableBindingError;

/// Six degree of freedom rigid body: earth-axes position, body-axes
/// velocity, 3-2-1 Euler attitude (radians) and body rates (rad/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct RigidBody3DEuler<T = f64> {
    pub x_e: T,
    pub y_e: T,
    pub z_e: T,
    pub u_b: T,
    pub v_b: T,
    pub w_b: T,
    pub phi: T,
    pub theta: T,
    pub psi: T,
    pub p: T,
    pub q: T,
    pub r: T,
}

/// Moment-equation constants of Stevens and Lewis for an airframe
/// symmetric about its XZ plane.
struct InertiaConstants<T> {
    c: [T; 9],
}

impl<T: Scalar> InertiaConstants<T> {
    fn new(mass: &MassProperties<T>) -> Self {
        let (ixx, iyy, izz, ixz) = (mass.ixx, mass.iyy, mass.izz, mass.ixz);
        let gamma = ixx * izz - ixz * ixz;
        Self {
            c: [
                ((iyy - izz) * izz - ixz * ixz) / gamma,
                (ixx - iyy + izz) * ixz / gamma,
                izz / gamma,
                ixz / gamma,
                (izz - ixx) / iyy,
                ixz / iyy,
                T::one() / iyy,
                (ixx * (ixx - iyy) + ixz * ixz) / gamma,
                ixx / gamma,
            ],
        }
    }
}

impl<T: Scalar> RigidBody3DEuler<T> {
    pub fn position(&self) -> Vector3<T> {
        Vector3::new(self.x_e, self.y_e, self.z_e)
    }

    pub fn velocity_body(&self) -> Vector3<T> {
        Vector3::new(self.u_b, self.v_b, self.w_b)
    }

    pub fn rates(&self) -> Vector3<T> {
        Vector3::new(self.p, self.q, self.r)
    }

    /// Angle of attack and sideslip (radians) of the body-axes velocity.
    pub fn alpha_beta(&self) -> (T, T) {
        let alpha = self.w_b.atan2(self.u_b);
        let beta = self
            .v_b
            .atan2((self.u_b * self.u_b + self.w_b * self.w_b).sqrt());
        (alpha, beta)
    }
}

impl<T: Scalar> Dynamics<T> for RigidBody3DEuler<T> {
    const STATE_NAMES: &'static [&'static str] = &[
        "x_e", "y_e", "z_e", "u_b", "v_b", "w_b", "phi", "theta", "psi", "p", "q", "r",
    ];

    fn state(&self) -> Vec<T> {
        vec![
            self.x_e, self.y_e, self.z_e, self.u_b, self.v_b, self.w_b, self.phi, self.theta,
            self.psi, self.p, self.q, self.r,
        ]
    }

    fn from_state(values: &[T]) -> Result<Self, VariableBindingError> {
        let [x_e, y_e, z_e, u_b, v_b, w_b, phi, theta, psi, p, q, r] = fields(values)?;
        Ok(Self {
            x_e,
            y_e,
            z_e,
            u_b,
            v_b,
            w_b,
            phi,
            theta,
            psi,
            p,
            q,
            r,
        })
    }

    /// Rates of every field. Needs `iyy > 0` and `ixx izz > ixz^2`; the
    /// Euler rates are singular at `theta = ±90°`.
    fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self {
        let to_earth = body_to_earth(self.phi, self.theta, self.psi);
        let (alpha, beta) = self.alpha_beta();
        let wind_to_earth = to_earth * wind_to_body(alpha, beta);
        let force = to_earth.transpose() * loads.net_force_earth(&to_earth, &wind_to_earth);
        let m = mass.mass;

        let (u, v, w) = (self.u_b, self.v_b, self.w_b);
        let (p, q, r) = (self.p, self.q, self.r);
        let (sphi, cphi) = (self.phi.sin(), self.phi.cos());

        let position = to_earth * self.velocity_body();
        let c = InertiaConstants::new(mass).c;
        let (l, n) = (loads.moment.x, loads.moment.z);

        Self {
            x_e: position.x,
            y_e: position.y,
            z_e: position.z,
            u_b: r * v - q * w + force.x / m,
            v_b: p * w - r * u + force.y / m,
            w_b: q * u - p * v + force.z / m,
            phi: p + self.theta.tan() * (q * sphi + r * cphi),
            theta: q * cphi - r * sphi,
            psi: (q * sphi + r * cphi) / self.theta.cos(),
            p: (c[0] * r + c[1] * p) * q + c[2] * l + c[3] * n,
            q: c[4] * p * r - c[5] * (p * p - r * r) + c[6] * loads.moment.y,
            r: (c[7] * p - c[1] * r) * q + c[3] * l + c[8] * n,
        }
    }

    fn to_inertial(&self) -> PointMass3DCartesian<T> {
        let to_earth = body_to_earth(self.phi, self.theta, self.psi);
        PointMass3DCartesian::new(self.position(), to_earth * self.velocity_body())
    }

    /// Level attitude and no rotation; body axes coincide with earth axes.
    fn from_inertial(inertial: &PointMass3DCartesian<T>) -> Self {
        let zero = T::zero();
        Self {
            x_e: inertial.x_e,
            y_e: inertial.y_e,
            z_e: inertial.z_e,
            u_b: inertial.u_e,
            v_b: inertial.v_e,
            w_b: inertial.w_e,
            phi: zero,
            theta: zero,
            psi: zero,
            p: zero,
            q: zero,
            r: zero,
        }
    }
}
