//! Vortex-lattice aerodynamics on the camber surface of an airplane.

mod linalg;
mod operating_point;
mod panels;
mod singularities;
mod vlm;

pub use linalg::solve_dense;
pub use operating_point::OperatingPoint;
pub use panels::{build_panels, Panel};
pub use singularities::horseshoe_induced_velocity;
pub use vlm::{AeroResults, VortexLatticeMethod};
