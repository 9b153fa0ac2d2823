use super::{Bindings, Bound, Problem, Var, VariableCache, VariableSpec};
use crate::utils::{Result, VariableBindingError};

/// The collaborator a model declares its decision variables on.
///
/// Geometry and solver code never talk to a context directly: they receive
/// scalars pulled out of [`Bindings`]. Only the binding layer
/// ([`variable`](super::variable), [`quasi_variable`](super::quasi_variable))
/// and the caller that owns the problem hold a context, and always as an
/// explicit parameter.
pub trait OptimizationContext {
    /// Declares a variable. The context decides whether it is free or
    /// pinned, and registers the spec's bounds only on free variables.
    fn declare(&mut self, spec: &VariableSpec) -> Var;

    fn num_variables(&self) -> usize;

    /// Registers a simple bound on a declared variable.
    fn subject_to(&mut self, bound: Bound);

    /// Minimizes the problem's objective subject to its constraints and the
    /// registered bounds.
    fn solve<P: Problem>(&self, problem: &P) -> Result<Solution>;
}

/// Result of a solve, from which bound variables can be substituted back.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    categories: Vec<Option<String>>,
    /// Objective at the returned point
    pub objective: f64,
    /// Total optimizer iterations over all rounds
    pub iterations: u64,
    /// Largest bound or constraint violation at the returned point
    pub constraint_violation: f64,
}

impl Solution {
    pub fn new(
        values: Vec<f64>,
        categories: Vec<Option<String>>,
        objective: f64,
        iterations: u64,
        constraint_violation: f64,
    ) -> Self {
        Self {
            values,
            categories,
            objective,
            iterations,
            constraint_violation,
        }
    }

    pub fn value(&self, var: Var) -> Result<f64, VariableBindingError> {
        self.values
            .get(var.index())
            .copied()
            .ok_or(VariableBindingError::UnknownVariable {
                index: var.index(),
                declared: self.values.len(),
            })
    }

    pub fn values_of(&self, vars: &[Var]) -> Result<Vec<f64>, VariableBindingError> {
        vars.iter().map(|&var| self.value(var)).collect()
    }

    /// Numeric values of every variable, for rebuilding the model at the
    /// optimum.
    pub fn bindings(&self) -> Bindings<f64> {
        Bindings::new(self.values.clone())
    }

    /// Solved values of every categorized variable, ready to seed frozen
    /// categories of a later problem.
    pub fn cache(&self) -> VariableCache {
        VariableCache::from_values(&self.values, &self.categories)
    }
}
