use argmin::{
    core::{
        CostFunction, Error as ArgminError, Executor, Gradient, IterState, OptimizationResult,
        State,
    },
    solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
};
use tracing::{debug, info, warn};

use super::{
    Bindings, Bound, Dual, OptimizationContext, Problem, Scalar, Solution, Var, VariableCache,
    VariableSpec,
};
use crate::{
    config::OptiConfig,
    utils::{Error, Result, SolverError, VariableBindingError},
};

/// Optimization context backed by argmin's L-BFGS.
///
/// Variables pinned by an equality bound are substituted exactly and never
/// reach the optimizer. Lower/upper bounds and the problem's own constraints
/// enter a quadratic penalty whose weight grows round over round until the
/// largest violation drops under the configured tolerance. Gradients come
/// from one forward-mode dual pass per free variable.
///
/// Variables declared in a frozen category are pinned as they are declared:
/// at the cached value of the same ordinal within that category when a
/// [`VariableCache`] is attached, otherwise at their initial guess.
#[derive(Debug, Clone, Default)]
pub struct Opti {
    initial: Vec<f64>,
    categories: Vec<Option<String>>,
    bounds: Vec<Bound>,
    frozen_categories: Vec<String>,
    cache: Option<VariableCache>,
    config: OptiConfig,
}

type LineSearch = MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64>;
type Solver = LBFGS<LineSearch, Vec<f64>, Vec<f64>, f64>;
type SolverState = IterState<Vec<f64>, Vec<f64>, (), (), (), f64>;

/// Which variables the optimizer moves and where pinned ones sit.
#[derive(Debug, Clone)]
struct VariableLayout {
    pinned: Vec<Option<f64>>,
    free: Vec<usize>,
    slot: Vec<Option<usize>>,
}

impl VariableLayout {
    fn new(num_variables: usize, bounds: &[Bound]) -> Self {
        let mut pinned = vec![None; num_variables];
        for bound in bounds {
            if let Bound::Equal { var, value } = *bound {
                if let Some(entry) = pinned.get_mut(var.index()) {
                    *entry = Some(value);
                }
            }
        }

        let mut free = Vec::new();
        let mut slot = vec![None; num_variables];
        for (index, entry) in pinned.iter().enumerate() {
            if entry.is_none() {
                slot[index] = Some(free.len());
                free.push(index);
            }
        }

        Self { pinned, free, slot }
    }

    /// Full bindings from the optimizer's free parameters.
    fn bindings<T: Scalar>(&self, free_values: &[T]) -> Bindings<T> {
        let values = self
            .pinned
            .iter()
            .zip(&self.slot)
            .map(|(pinned, slot)| match (pinned, slot) {
                (Some(value), _) => T::from_f64(*value),
                (None, Some(position)) => free_values[*position],
                (None, None) => T::zero(),
            })
            .collect();
        Bindings::new(values)
    }
}

/// Objective plus weighted squared violations, as seen by argmin.
struct PenaltyMerit<'a, P> {
    problem: &'a P,
    bounds: &'a [Bound],
    layout: &'a VariableLayout,
    weight: f64,
}

impl<P: Problem> PenaltyMerit<'_, P> {
    fn merit<T: Scalar>(&self, free_values: &[T]) -> Result<T> {
        let vars = self.layout.bindings(free_values);
        let mut merit = self.problem.objective(&vars)?;

        for bound in self.bounds {
            let x = vars.value(bound.var())?;
            let excess = match *bound {
                Bound::Lower { value, .. } => -(x - value),
                Bound::Upper { value, .. } => x - value,
                Bound::Equal { .. } => continue,
            };
            if excess.value() > 0.0 {
                merit += excess * excess * self.weight;
            }
        }

        for constraint in self.problem.constraints(&vars)? {
            let residual = constraint.residual();
            merit += residual * residual * self.weight;
        }

        if !merit.is_finite() {
            return Err(SolverError::NonFinite("penalized objective".to_string()).into());
        }
        Ok(merit)
    }
}

impl<P: Problem> CostFunction for PenaltyMerit<'_, P> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(self.merit(param)?)
    }
}

impl<P: Problem> Gradient for PenaltyMerit<'_, P> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        let mut seeded: Vec<Dual> = param.iter().map(|&x| Dual::constant(x)).collect();
        let mut gradient = Vec::with_capacity(param.len());
        for i in 0..param.len() {
            seeded[i].eps = 1.0;
            gradient.push(self.merit(&seeded)?.eps);
            seeded[i].eps = 0.0;
        }
        Ok(gradient)
    }
}

/// Maps an argmin failure back to the crate error it carried, if any.
fn optimizer_error(error: ArgminError) -> Error {
    match error.downcast::<Error>() {
        Ok(inner) => inner,
        Err(other) => SolverError::Optimizer(other.to_string()).into(),
    }
}

impl Opti {
    pub fn new(config: OptiConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Pins every variable later declared in one of `categories`.
    pub fn with_frozen_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frozen_categories
            .extend(categories.into_iter().map(Into::into));
        self
    }

    /// Source of the values frozen categories are pinned at.
    pub fn with_cache(mut self, cache: VariableCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &OptiConfig {
        &self.config
    }

    pub fn category_of(&self, var: Var) -> Option<&str> {
        self.categories.get(var.index()).and_then(|c| c.as_deref())
    }

    pub fn is_frozen_category(&self, category: &str) -> bool {
        self.frozen_categories.iter().any(|c| c == category)
    }

    /// Value a newly declared variable is pinned at, if it is pinned.
    fn pinned_value(&self, spec: &VariableSpec) -> Option<f64> {
        if spec.freeze {
            return Some(spec.initial);
        }
        let category = spec.category.as_deref()?;
        if !self.is_frozen_category(category) {
            return None;
        }

        let ordinal = self
            .categories
            .iter()
            .filter(|c| c.as_deref() == Some(category))
            .count();
        match self.cache.as_ref().and_then(|cache| cache.get(category, ordinal)) {
            Some(value) => Some(value),
            None => {
                warn!(
                    "No cached value for variable {} of frozen category {}; pinning at its initial guess",
                    ordinal, category
                );
                Some(spec.initial)
            }
        }
    }

    /// Every bound registered so far, in registration order.
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Bindings at the initial guess, e.g. for evaluating the model before
    /// solving.
    pub fn initial_bindings(&self) -> Bindings<f64> {
        Bindings::new(self.initial.clone())
    }

    /// Moves the initial guess of a declared variable.
    pub fn set_initial(&mut self, var: Var, value: f64) -> Result<(), VariableBindingError> {
        let declared = self.initial.len();
        let entry = self
            .initial
            .get_mut(var.index())
            .ok_or(VariableBindingError::UnknownVariable {
                index: var.index(),
                declared,
            })?;
        *entry = value;
        Ok(())
    }

    /// Largest violation of any bound or problem constraint.
    fn violation<P: Problem>(&self, problem: &P, vars: &Bindings<f64>) -> Result<f64> {
        let mut worst: f64 = 0.0;
        for bound in &self.bounds {
            worst = worst.max(bound.violation(vars.value(bound.var())?));
        }
        for constraint in problem.constraints(vars)? {
            worst = worst.max(constraint.violation());
        }
        Ok(worst)
    }

    fn minimize_round<P: Problem>(
        &self,
        merit: PenaltyMerit<'_, P>,
        start: Vec<f64>,
    ) -> Result<(Vec<f64>, u64)> {
        let linesearch: LineSearch = MoreThuenteLineSearch::new()
            .with_c(1e-4, 0.9)
            .map_err(optimizer_error)?;
        let solver: Solver = LBFGS::new(linesearch, self.config.lbfgs_memory)
            .with_tolerance_grad(self.config.gradient_tolerance)
            .map_err(optimizer_error)?
            .with_tolerance_cost(self.config.cost_tolerance)
            .map_err(optimizer_error)?;

        let max_iters = self.config.max_iterations;
        let param = start.clone();
        let result: OptimizationResult<PenaltyMerit<'_, P>, Solver, SolverState> =
            Executor::new(merit, solver)
                .configure(move |state| state.param(param).max_iters(max_iters))
                .run()
                .map_err(optimizer_error)?;

        let state = result.state();
        let best = state.get_best_param().cloned().unwrap_or(start);
        Ok((best, state.get_iter()))
    }
}

impl OptimizationContext for Opti {
    fn declare(&mut self, spec: &VariableSpec) -> Var {
        let pinned = self.pinned_value(spec);
        let var = Var::from_index(self.initial.len());
        self.initial.push(pinned.unwrap_or(spec.initial));
        self.categories.push(spec.category.clone());

        match pinned {
            Some(value) => self.bounds.push(Bound::Equal { var, value }),
            None => {
                if let Some(value) = spec.lower {
                    self.bounds.push(Bound::Lower { var, value });
                }
                if let Some(value) = spec.upper {
                    self.bounds.push(Bound::Upper { var, value });
                }
            }
        }
        var
    }

    fn num_variables(&self) -> usize {
        self.initial.len()
    }

    fn subject_to(&mut self, bound: Bound) {
        self.bounds.push(bound);
    }

    fn solve<P: Problem>(&self, problem: &P) -> Result<Solution> {
        let layout = VariableLayout::new(self.initial.len(), &self.bounds);
        let penalized: Vec<Bound> = self
            .bounds
            .iter()
            .filter(|bound| !matches!(bound, Bound::Equal { .. }))
            .copied()
            .collect();

        let mut param: Vec<f64> = layout.free.iter().map(|&i| self.initial[i]).collect();
        let mut violation = self.violation(problem, &layout.bindings(&param))?;
        let mut weight = self.config.penalty_weight;
        let mut iterations = 0;

        info!(
            "Solving with {} free and {} pinned variables",
            layout.free.len(),
            self.initial.len() - layout.free.len()
        );

        if !param.is_empty() {
            for round in 0..self.config.penalty_rounds {
                let merit = PenaltyMerit {
                    problem,
                    bounds: &penalized,
                    layout: &layout,
                    weight,
                };
                let (best, iters) = self.minimize_round(merit, param)?;
                param = best;
                iterations += iters;
                violation = self.violation(problem, &layout.bindings(&param))?;

                debug!(
                    "Penalty round {}: weight {:.1e}, {} iterations, violation {:.3e}",
                    round, weight, iters, violation
                );

                if violation <= self.config.constraint_tolerance {
                    break;
                }
                weight *= self.config.penalty_growth;
            }
        }

        let vars = layout.bindings(&param);
        let objective = problem.objective(&vars)?;

        if violation > self.config.constraint_tolerance {
            warn!(
                "Optimization stopped with constraint violation {:.3e}",
                violation
            );
            return Err(SolverError::NotConverged {
                violation,
                tolerance: self.config.constraint_tolerance,
            }
            .into());
        }

        info!(
            "Optimization converged: objective {:.6e} after {} iterations",
            objective, iterations
        );
        Ok(Solution::new(
            vars.values().to_vec(),
            self.categories.clone(),
            objective,
            iterations,
            violation,
        ))
    }
}
