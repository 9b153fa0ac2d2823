use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Airfoil;
use crate::optimization::Scalar;
use crate::utils::DEFAULT_HINGE_POINT;

/// How a control surface responds on the mirrored half of a symmetric wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSurfaceKind {
    #[default]
    None,
    /// Both halves deflect the same way (flap, elevator).
    Symmetric,
    /// The mirrored half deflects opposite (aileron).
    Asymmetric,
}

/// A control surface acting on the section outboard of its cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    bound(
        serialize = "T: Scalar + Serialize",
        deserialize = "T: Scalar + Deserialize<'de>"
    )
)]
pub struct ControlSurface<T = f64> {
    pub kind: ControlSurfaceKind,
    /// Deflection in degrees, positive trailing edge down
    pub deflection: T,
    /// Hinge location as a fraction of chord
    pub hinge_point: T,
}

impl<T: Scalar> Default for ControlSurface<T> {
    fn default() -> Self {
        Self {
            kind: ControlSurfaceKind::None,
            deflection: T::zero(),
            hinge_point: T::from_f64(DEFAULT_HINGE_POINT),
        }
    }
}

impl<T: Scalar> ControlSurface<T> {
    pub fn new(kind: ControlSurfaceKind, deflection: T) -> Self {
        Self {
            kind,
            deflection,
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.kind != ControlSurfaceKind::None
    }

    /// Deflection seen by one half of the wing.
    pub fn deflection_for(&self, mirrored: bool) -> T {
        match (self.kind, mirrored) {
            (ControlSurfaceKind::None, _) => T::zero(),
            (ControlSurfaceKind::Asymmetric, true) => -self.deflection,
            _ => self.deflection,
        }
    }
}

/// A wing cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct WingXSec<T: Scalar = f64> {
    /// Leading edge, relative to the wing's leading edge
    pub xyz_le: Vector3<T>,
    pub chord: T,
    /// Twist in degrees, positive nose up
    #[serde(default)]
    pub twist: T,
    pub airfoil: Arc<Airfoil>,
    #[serde(default)]
    pub control_surface: ControlSurface<T>,
}

impl<T: Scalar> WingXSec<T> {
    /// Creates a cross-section without a control surface.
    ///
    /// # Arguments
    /// * `xyz_le` - Leading edge relative to the parent wing (m).
    /// * `chord` - Chord length (m).
    /// * `twist` - Twist about the leading edge (degrees).
    /// * `airfoil` - Section shape, shared with other cross-sections.
    pub fn new(xyz_le: Vector3<T>, chord: T, twist: T, airfoil: Arc<Airfoil>) -> Self {
        Self {
            xyz_le,
            chord,
            twist,
            airfoil,
            control_surface: ControlSurface::default(),
        }
    }

    pub fn with_control_surface(mut self, kind: ControlSurfaceKind, deflection: T) -> Self {
        self.control_surface.kind = kind;
        self.control_surface.deflection = deflection;
        self
    }

    pub fn with_hinge_point(mut self, hinge_point: T) -> Self {
        self.control_surface.hinge_point = hinge_point;
        self
    }
}

impl WingXSec<f64> {
    /// The same cross-section with constant scalars of another type.
    pub fn lift<U: Scalar>(&self) -> WingXSec<U> {
        WingXSec {
            xyz_le: self.xyz_le.map(U::from_f64),
            chord: U::from_f64(self.chord),
            twist: U::from_f64(self.twist),
            airfoil: Arc::clone(&self.airfoil),
            control_surface: ControlSurface {
                kind: self.control_surface.kind,
                deflection: U::from_f64(self.control_surface.deflection),
                hinge_point: U::from_f64(self.control_surface.hinge_point),
            },
        }
    }
}

/// A circular fuselage cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct FuselageXSec<T: Scalar = f64> {
    /// Center, relative to the fuselage's leading edge
    pub xyz_c: Vector3<T>,
    pub radius: T,
}

impl<T: Scalar> FuselageXSec<T> {
    pub fn new(xyz_c: Vector3<T>, radius: T) -> Self {
        Self { xyz_c, radius }
    }
}

impl FuselageXSec<f64> {
    pub fn lift<U: Scalar>(&self) -> FuselageXSec<U> {
        FuselageXSec {
            xyz_c: self.xyz_c.map(U::from_f64),
            radius: U::from_f64(self.radius),
        }
    }
}
