use serde::{Deserialize, Serialize};

use super::{OptimizationContext, Scalar};
use crate::utils::VariableBindingError;

/// Opaque handle to a decision variable declared on an optimization context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var(usize);

impl Var {
    /// Wraps a context-assigned index. Only optimization contexts should
    /// mint handles.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Simple bound on a single variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Lower { var: Var, value: f64 },
    Upper { var: Var, value: f64 },
    Equal { var: Var, value: f64 },
}

impl Bound {
    pub fn var(&self) -> Var {
        match *self {
            Bound::Lower { var, .. } | Bound::Upper { var, .. } | Bound::Equal { var, .. } => var,
        }
    }

    /// Amount by which `x` violates the bound (zero when satisfied).
    pub fn violation(&self, x: f64) -> f64 {
        match *self {
            Bound::Lower { value, .. } => (value - x).max(0.0),
            Bound::Upper { value, .. } => (x - value).max(0.0),
            Bound::Equal { value, .. } => (x - value).abs(),
        }
    }
}

/// Values of every declared variable, in the scalar type of the current
/// evaluation.
///
/// This is the only place variable-backed scalars come from: a problem pulls
/// its attributes out of the bindings and hands them to geometry, solver and
/// dynamics code as ordinary scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<T = f64> {
    values: Vec<T>,
}

impl<T: Scalar> Bindings<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Current value of `var`.
    pub fn value(&self, var: Var) -> Result<T, VariableBindingError> {
        self.values
            .get(var.index())
            .copied()
            .ok_or(VariableBindingError::UnknownVariable {
                index: var.index(),
                declared: self.values.len(),
            })
    }

    /// Values of several variables at once, e.g. a time series.
    pub fn values_of(&self, vars: &[Var]) -> Result<Vec<T>, VariableBindingError> {
        vars.iter().map(|&var| self.value(var)).collect()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything a context needs to declare one decision variable.
///
/// A variable may belong to a named category. An [`Opti`](super::Opti)
/// configured to freeze that category pins the variable instead of
/// optimizing it, at the value cached from an earlier solve when one exists.
/// A variable marked `freeze` is always pinned at its initial value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub initial: f64,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub freeze: bool,
}

impl VariableSpec {
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            ..Default::default()
        }
    }

    pub fn bounded(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn frozen(mut self) -> Self {
        self.freeze = true;
        self
    }

    pub fn declare<C: OptimizationContext + ?Sized>(&self, context: &mut C) -> Var {
        context.declare(self)
    }

    /// Declares `n` variables sharing this spec, e.g. one per time step.
    pub fn declare_vector<C: OptimizationContext + ?Sized>(
        &self,
        context: &mut C,
        n: usize,
    ) -> Vec<Var> {
        (0..n).map(|_| context.declare(self)).collect()
    }
}

/// Declares a free decision variable seeded at `initial`, registering any
/// given bounds as inequality constraints on the context.
pub fn variable<C: OptimizationContext + ?Sized>(
    context: &mut C,
    initial: f64,
    lower: Option<f64>,
    upper: Option<f64>,
) -> Var {
    VariableSpec::new(initial)
        .bounded(lower, upper)
        .declare(context)
}

/// Declares a variable pinned to `value` by an equality constraint, so that
/// held-fixed attributes go through the same code path as optimized ones.
pub fn quasi_variable<C: OptimizationContext + ?Sized>(context: &mut C, value: f64) -> Var {
    VariableSpec::new(value).frozen().declare(context)
}

/// Declares one variable per entry of `initial`, e.g. a discretized
/// trajectory, each with the same optional bounds.
pub fn variable_series<C: OptimizationContext + ?Sized>(
    context: &mut C,
    initial: &[f64],
    lower: Option<f64>,
    upper: Option<f64>,
) -> Vec<Var> {
    initial
        .iter()
        .map(|&x| variable(context, x, lower, upper))
        .collect()
}
