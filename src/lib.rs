//! Parametric aircraft geometry, vortex-lattice aerodynamics and point-mass
//! and rigid-body dynamics, generic over a differentiable scalar so that a
//! whole analysis can sit inside a gradient-based optimization.

pub mod aerodynamics;
pub mod config;
pub mod dynamics;
pub mod geometry;
pub mod optimization;
pub mod utils;

pub use aerodynamics::{AeroResults, OperatingPoint, VortexLatticeMethod};
pub use config::{MeshConfig, OptiConfig, VlmConfig};
pub use dynamics::{DynamicsState, Loads, MassProperties, Representation};
pub use geometry::{Airfoil, Airplane, Fuselage, FuselageXSec, Wing, WingXSec};
pub use optimization::{quasi_variable, variable, Bindings, Dual, Opti, OptimizationContext, Problem, Scalar};
pub use utils::{Error, Result};
