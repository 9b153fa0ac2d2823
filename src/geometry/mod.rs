//! Parametric aircraft geometry and its mesh generation.

mod airfoil;
mod airplane;
mod fuselage;
mod mesh;
mod wing;
mod xsec;

pub use airfoil::Airfoil;
pub use airplane::{Airplane, ReferenceDimensions};
pub use fuselage::Fuselage;
pub use mesh::Mesh;
pub use wing::{CamberGrid, Wing};
pub use xsec::{ControlSurface, ControlSurfaceKind, FuselageXSec, WingXSec};
