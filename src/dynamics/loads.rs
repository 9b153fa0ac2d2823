use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::optimization::Scalar;

/// Frame a force vector is expressed in.
///
/// Earth axes are north, east, down. Body axes are forward, starboard,
/// down. Wind axes have x along the air-relative velocity; a point mass has
/// no attitude, so its body axes are its wind axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axes {
    Earth,
    Wind,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Force<T: Scalar = f64> {
    pub vector: Vector3<T>,
    pub axes: Axes,
}

/// Forces and moments acting on a vehicle, accumulated before a
/// derivative evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Loads<T: Scalar = f64> {
    pub forces: Vec<Force<T>>,
    /// Net moment about the center of mass, body axes
    pub moment: Vector3<T>,
}

impl<T: Scalar> Default for Loads<T> {
    fn default() -> Self {
        Self {
            forces: Vec::new(),
            moment: Vector3::zeros(),
        }
    }
}

impl<T: Scalar> Loads<T> {
    pub fn add_force(&mut self, axes: Axes, vector: Vector3<T>) {
        self.forces.push(Force { vector, axes });
    }

    pub fn add_moment(&mut self, moment: Vector3<T>) {
        self.moment += moment;
    }

    /// Weight of `mass` under gravitational acceleration `g`.
    pub fn add_gravity(&mut self, mass: T, g: f64) {
        self.add_force(
            Axes::Earth,
            Vector3::new(T::zero(), T::zero(), mass * g),
        );
    }

    /// Merges another set of loads into this one.
    pub fn extend(&mut self, other: Loads<T>) {
        self.forces.extend(other.forces);
        self.moment += other.moment;
    }

    /// Net force in earth axes, given the rotations taking body and wind
    /// vectors into earth axes.
    pub fn net_force_earth(&self, body_to_earth: &Matrix3<T>, wind_to_earth: &Matrix3<T>) -> Vector3<T> {
        self.forces
            .iter()
            .fold(Vector3::zeros(), |net, force| {
                net + match force.axes {
                    Axes::Earth => force.vector,
                    Axes::Body => body_to_earth * force.vector,
                    Axes::Wind => wind_to_earth * force.vector,
                }
            })
    }
}

/// Mass and inertia about the center of mass, body axes (kg, kg m^2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct MassProperties<T = f64> {
    pub mass: T,
    #[serde(default)]
    pub ixx: T,
    #[serde(default)]
    pub iyy: T,
    #[serde(default)]
    pub izz: T,
    #[serde(default)]
    pub ixz: T,
}

impl<T: Scalar> MassProperties<T> {
    /// A point mass with no rotational inertia.
    pub fn point_mass(mass: T) -> Self {
        Self {
            mass,
            ixx: T::zero(),
            iyy: T::zero(),
            izz: T::zero(),
            ixz: T::zero(),
        }
    }

    pub fn with_inertia(mut self, ixx: T, iyy: T, izz: T, ixz: T) -> Self {
        self.ixx = ixx;
        self.iyy = iyy;
        self.izz = izz;
        self.ixz = ixz;
        self
    }

    pub fn inertia_tensor(&self) -> Matrix3<T> {
        let zero = T::zero();
        Matrix3::new(
            self.ixx, zero, -self.ixz,
            zero, self.iyy, zero,
            -self.ixz, zero, self.izz,
        )
    }
}

/// Rotation from body to earth axes for a 3-2-1 (yaw, pitch, roll)
/// Euler sequence.
pub fn body_to_earth<T: Scalar>(phi: T, theta: T, psi: T) -> Matrix3<T> {
    let (sphi, cphi) = (phi.sin(), phi.cos());
    let (sth, cth) = (theta.sin(), theta.cos());
    let (spsi, cpsi) = (psi.sin(), psi.cos());
    Matrix3::new(
        cth * cpsi,
        sphi * sth * cpsi - cphi * spsi,
        cphi * sth * cpsi + sphi * spsi,
        cth * spsi,
        sphi * sth * spsi + cphi * cpsi,
        cphi * sth * spsi - sphi * cpsi,
        -sth,
        sphi * cth,
        cphi * cth,
    )
}

/// Rotation from wind to earth axes for a flight path angle `gamma`
/// (positive climbing) and track angle `chi`, wings level.
pub fn wind_to_earth<T: Scalar>(gamma: T, chi: T) -> Matrix3<T> {
    let (sg, cg) = (gamma.sin(), gamma.cos());
    let (sc, cc) = (chi.sin(), chi.cos());
    Matrix3::from_columns(&[
        Vector3::new(cg * cc, cg * sc, -sg),
        Vector3::new(-sc, cc, T::zero()),
        Vector3::new(sg * cc, sg * sc, cg),
    ])
}

/// Rotation from wind to body axes for angle of attack `alpha` and
/// sideslip `beta` (radians).
pub fn wind_to_body<T: Scalar>(alpha: T, beta: T) -> Matrix3<T> {
    let (sa, ca) = (alpha.sin(), alpha.cos());
    let (sb, cb) = (beta.sin(), beta.cos());
    Matrix3::from_columns(&[
        Vector3::new(ca * cb, sb, sa * cb),
        Vector3::new(-ca * sb, cb, -sa * sb),
        Vector3::new(-sa, T::zero(), ca),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::utils::GRAVITY;

    #[test]
    fn test_gravity_points_down() {
        let mut loads = Loads::default();
        loads.add_gravity(2.0, GRAVITY);
        let net = loads.net_force_earth(&Matrix3::identity(), &Matrix3::identity());
        assert_relative_eq!(net, Vector3::new(0.0, 0.0, 2.0 * GRAVITY));
    }

    #[test]
    fn test_rotations_are_orthonormal() {
        for rotation in [
            body_to_earth(0.3, -0.2, 1.4),
            wind_to_earth(0.25, -2.0),
            wind_to_body(0.1, 0.05),
        ] {
            assert_relative_eq!(rotation.transpose() * rotation, Matrix3::identity(), epsilon = 1e-12);
            assert_relative_eq!(rotation.determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pitched_body_axes() {
        // Nose 90 degrees up: body x points up, i.e. earth -z
        let rotation = body_to_earth(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        assert_relative_eq!(rotation * Vector3::x(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_forces_resolve_by_axes() {
        let mut loads = Loads::default();
        loads.add_force(Axes::Body, Vector3::new(1.0, 0.0, 0.0));
        loads.add_force(Axes::Wind, Vector3::new(0.0, 0.0, -3.0));
        loads.add_moment(Vector3::new(0.0, 0.5, 0.0));
        loads.add_moment(Vector3::new(0.0, 0.5, 0.0));

        let climbing = wind_to_earth(std::f64::consts::FRAC_PI_2, 0.0);
        let net = loads.net_force_earth(&Matrix3::identity(), &climbing);
        // In a vertical climb wind z points north
        assert_relative_eq!(net, Vector3::new(-2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(loads.moment.y, 1.0);
    }
}
