//! Point-mass and rigid-body equations of motion in interchangeable state
//! representations.
//!
//! A state never integrates itself. [`Dynamics::derivative`] returns the
//! rate of every field for the loads applied, so the same equations serve
//! a time-stepping simulation and a collocation constraint inside an
//! optimization problem alike.

mod loads;
mod point_2d;
mod point_3d;
mod rigid_body;
mod trajectory;

use serde::{Deserialize, Serialize};

use crate::optimization::Scalar;
use crate::utils::VariableBindingError;

pub use loads::{body_to_earth, wind_to_body, wind_to_earth, Axes, Force, Loads, MassProperties};
pub use point_2d::{PointMass2DCartesian, PointMass2DSpeedGamma};
pub use point_3d::PointMass3DCartesian;
pub use rigid_body::RigidBody3DEuler;
pub use trajectory::{Trajectory, TrajectoryVariables};

/// Capabilities shared by every state representation.
pub trait Dynamics<T: Scalar>: Sized {
    /// Field names, in the order of [`Dynamics::state`].
    const STATE_NAMES: &'static [&'static str];

    fn state(&self) -> Vec<T>;

    fn from_state(values: &[T]) -> Result<Self, VariableBindingError>;

    /// Time derivative of every field, in this representation.
    fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self;

    /// The same state as an earth-axes point mass.
    fn to_inertial(&self) -> PointMass3DCartesian<T>;

    fn from_inertial(inertial: &PointMass3DCartesian<T>) -> Self;
}

/// Splits a flat state vector into its `N` fields.
pub(crate) fn fields<T: Scalar, const N: usize>(values: &[T]) -> Result<[T; N], VariableBindingError> {
    values
        .try_into()
        .map_err(|_| VariableBindingError::LengthMismatch {
            expected: N,
            found: values.len(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Representation {
    #[serde(rename = "point_mass_2d_cartesian")]
    PointMass2DCartesian,
    #[serde(rename = "point_mass_2d_speed_gamma")]
    PointMass2DSpeedGamma,
    #[serde(rename = "point_mass_3d_cartesian")]
    PointMass3DCartesian,
    #[serde(rename = "rigid_body_3d_euler")]
    RigidBody3DEuler,
}

impl Representation {
    /// Field names of this representation's state vector.
    pub fn state_names(self) -> &'static [&'static str] {
        match self {
            Self::PointMass2DCartesian => PointMass2DCartesian::<f64>::STATE_NAMES,
            Self::PointMass2DSpeedGamma => PointMass2DSpeedGamma::<f64>::STATE_NAMES,
            Self::PointMass3DCartesian => PointMass3DCartesian::<f64>::STATE_NAMES,
            Self::RigidBody3DEuler => RigidBody3DEuler::<f64>::STATE_NAMES,
        }
    }

    pub fn field_index(self, name: &str) -> Result<usize, VariableBindingError> {
        self.state_names()
            .iter()
            .position(|field| *field == name)
            .ok_or_else(|| VariableBindingError::UnknownField(name.to_string()))
    }
}

/// A dynamics state in any of the supported representations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "representation",
    bound(
        serialize = "T: Scalar + Serialize",
        deserialize = "T: Scalar + Deserialize<'de>"
    )
)]
pub enum DynamicsState<T = f64> {
    #[serde(rename = "point_mass_2d_cartesian")]
    PointMass2DCartesian(PointMass2DCartesian<T>),
    #[serde(rename = "point_mass_2d_speed_gamma")]
    PointMass2DSpeedGamma(PointMass2DSpeedGamma<T>),
    #[serde(rename = "point_mass_3d_cartesian")]
    PointMass3DCartesian(PointMass3DCartesian<T>),
    #[serde(rename = "rigid_body_3d_euler")]
    RigidBody3DEuler(RigidBody3DEuler<T>),
}

macro_rules! dispatch {
    ($state:expr, $inner:ident => $body:expr) => {
        match $state {
            DynamicsState::PointMass2DCartesian($inner) => $body,
            DynamicsState::PointMass2DSpeedGamma($inner) => $body,
            DynamicsState::PointMass3DCartesian($inner) => $body,
            DynamicsState::RigidBody3DEuler($inner) => $body,
        }
    };
}

impl<T: Scalar> DynamicsState<T> {
    pub fn kind(&self) -> Representation {
        match self {
            Self::PointMass2DCartesian(_) => Representation::PointMass2DCartesian,
            Self::PointMass2DSpeedGamma(_) => Representation::PointMass2DSpeedGamma,
            Self::PointMass3DCartesian(_) => Representation::PointMass3DCartesian,
            Self::RigidBody3DEuler(_) => Representation::RigidBody3DEuler,
        }
    }

    pub fn state_names(&self) -> &'static [&'static str] {
        self.kind().state_names()
    }

    pub fn state(&self) -> Vec<T> {
        dispatch!(self, inner => inner.state())
    }

    /// A state of the same representation holding `values`.
    pub fn with_state(&self, values: &[T]) -> Result<Self, VariableBindingError> {
        Self::from_state(self.kind(), values)
    }

    pub fn from_state(kind: Representation, values: &[T]) -> Result<Self, VariableBindingError> {
        Ok(match kind {
            Representation::PointMass2DCartesian => {
                Self::PointMass2DCartesian(PointMass2DCartesian::from_state(values)?)
            }
            Representation::PointMass2DSpeedGamma => {
                Self::PointMass2DSpeedGamma(PointMass2DSpeedGamma::from_state(values)?)
            }
            Representation::PointMass3DCartesian => {
                Self::PointMass3DCartesian(PointMass3DCartesian::from_state(values)?)
            }
            Representation::RigidBody3DEuler => {
                Self::RigidBody3DEuler(RigidBody3DEuler::from_state(values)?)
            }
        })
    }

    pub fn derivative(&self, loads: &Loads<T>, mass: &MassProperties<T>) -> Self {
        match self {
            Self::PointMass2DCartesian(s) => Self::PointMass2DCartesian(s.derivative(loads, mass)),
            Self::PointMass2DSpeedGamma(s) => Self::PointMass2DSpeedGamma(s.derivative(loads, mass)),
            Self::PointMass3DCartesian(s) => Self::PointMass3DCartesian(s.derivative(loads, mass)),
            Self::RigidBody3DEuler(s) => Self::RigidBody3DEuler(s.derivative(loads, mass)),
        }
    }

    pub fn to_inertial(&self) -> PointMass3DCartesian<T> {
        dispatch!(self, inner => inner.to_inertial())
    }

    pub fn from_inertial(kind: Representation, inertial: &PointMass3DCartesian<T>) -> Self {
        match kind {
            Representation::PointMass2DCartesian => {
                Self::PointMass2DCartesian(PointMass2DCartesian::from_inertial(inertial))
            }
            Representation::PointMass2DSpeedGamma => {
                Self::PointMass2DSpeedGamma(PointMass2DSpeedGamma::from_inertial(inertial))
            }
            Representation::PointMass3DCartesian => Self::PointMass3DCartesian(*inertial),
            Representation::RigidBody3DEuler => {
                Self::RigidBody3DEuler(RigidBody3DEuler::from_inertial(inertial))
            }
        }
    }

    /// The same physical state in another representation, through the
    /// inertial frame.
    pub fn convert(&self, kind: Representation) -> Self {
        if kind == self.kind() {
            return *self;
        }
        Self::from_inertial(kind, &self.to_inertial())
    }
}

impl<T: Scalar> From<PointMass2DCartesian<T>> for DynamicsState<T> {
    fn from(state: PointMass2DCartesian<T>) -> Self {
        Self::PointMass2DCartesian(state)
    }
}

impl<T: Scalar> From<PointMass2DSpeedGamma<T>> for DynamicsState<T> {
    fn from(state: PointMass2DSpeedGamma<T>) -> Self {
        Self::PointMass2DSpeedGamma(state)
    }
}

impl<T: Scalar> From<PointMass3DCartesian<T>> for DynamicsState<T> {
    fn from(state: PointMass3DCartesian<T>) -> Self {
        Self::PointMass3DCartesian(state)
    }
}

impl<T: Scalar> From<RigidBody3DEuler<T>> for DynamicsState<T> {
    fn from(state: RigidBody3DEuler<T>) -> Self {
        Self::RigidBody3DEuler(state)
    }
}
