//! Decision variables, differentiable scalars and the optimization context.

mod binding;
mod cache;
mod context;
mod dual;
mod opti;
mod problem;
mod scalar;

pub use binding::{quasi_variable, variable, variable_series, Bindings, Bound, Var, VariableSpec};
pub use cache::VariableCache;
pub use context::{OptimizationContext, Solution};
pub use dual::Dual;
pub use opti::Opti;
pub use problem::{Constraint, Problem};
pub use scalar::Scalar;
