use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DynamicsState, Loads, MassProperties, Representation};
use crate::optimization::{
    variable_series, Bindings, Bound, Constraint, OptimizationContext, Scalar, Var,
};
use crate::utils::{Result, VariableBindingError};

/// A dynamics state sampled at discrete nodes, stored as one series per
/// state field.
///
/// Every node shares one representation. Indexing is `fields[field][node]`
/// in the order of [`Representation::state_names`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Trajectory<T = f64> {
    kind: Representation,
    fields: Vec<Vec<T>>,
}

impl<T: Scalar> Trajectory<T> {
    pub fn new(kind: Representation, fields: Vec<Vec<T>>) -> Result<Self, VariableBindingError> {
        let expected = kind.state_names().len();
        if fields.len() != expected {
            return Err(VariableBindingError::LengthMismatch {
                expected,
                found: fields.len(),
            });
        }
        let num_nodes = fields[0].len();
        if num_nodes == 0 {
            return Err(VariableBindingError::EmptyTrajectory);
        }
        if let Some(series) = fields.iter().find(|series| series.len() != num_nodes) {
            return Err(VariableBindingError::LengthMismatch {
                expected: num_nodes,
                found: series.len(),
            });
        }
        Ok(Self { kind, fields })
    }

    /// Stacks states into a trajectory in the representation of the first,
    /// converting the rest through the inertial frame.
    pub fn from_states(states: &[DynamicsState<T>]) -> Result<Self, VariableBindingError> {
        let kind = states
            .first()
            .ok_or(VariableBindingError::EmptyTrajectory)?
            .kind();
        let mut fields = vec![Vec::with_capacity(states.len()); kind.state_names().len()];
        for state in states {
            for (series, value) in fields.iter_mut().zip(state.convert(kind).state()) {
                series.push(value);
            }
        }
        Self::new(kind, fields)
    }

    pub fn kind(&self) -> Representation {
        self.kind
    }

    pub fn num_nodes(&self) -> usize {
        self.fields[0].len()
    }

    /// Time series of one named field.
    pub fn field(&self, name: &str) -> Result<&[T], VariableBindingError> {
        Ok(&self.fields[self.kind.field_index(name)?])
    }

    /// The state at `node`.
    pub fn state(&self, node: usize) -> Result<DynamicsState<T>, VariableBindingError> {
        let values = self
            .fields
            .iter()
            .map(|series| {
                series
                    .get(node)
                    .copied()
                    .ok_or(VariableBindingError::UnknownVariable {
                        index: node,
                        declared: series.len(),
                    })
            })
            .collect::<Result<Vec<T>, _>>()?;
        DynamicsState::from_state(self.kind, &values)
    }

    pub fn states(&self) -> Result<Vec<DynamicsState<T>>, VariableBindingError> {
        (0..self.num_nodes()).map(|node| self.state(node)).collect()
    }

    /// Rates of every field at every node, for the loads `loads` returns
    /// at each node.
    pub fn derivatives<F>(&self, mass: &MassProperties<T>, mut loads: F) -> Result<Self>
    where
        F: FnMut(usize, &DynamicsState<T>) -> Result<Loads<T>>,
    {
        let mut rates = Vec::with_capacity(self.num_nodes());
        for (node, state) in self.states()?.iter().enumerate() {
            let applied = loads(node, state)?;
            rates.push(state.derivative(&applied, mass));
        }
        Ok(Self::from_states(&rates)?)
    }

    /// Trapezoidal collocation defects between consecutive nodes spaced `dt`
    /// apart, field by field: zero when the trajectory integrates `rates`.
    pub fn trapezoidal_defects(&self, rates: &Self, dt: T) -> Result<Vec<T>, VariableBindingError> {
        if rates.kind != self.kind || rates.num_nodes() != self.num_nodes() {
            return Err(VariableBindingError::LengthMismatch {
                expected: self.num_nodes(),
                found: rates.num_nodes(),
            });
        }
        let half_step = dt * 0.5;
        let mut defects = Vec::with_capacity(self.fields.len() * (self.num_nodes() - 1));
        for (x, f) in self.fields.iter().zip(&rates.fields) {
            for k in 0..self.num_nodes() - 1 {
                defects.push(x[k + 1] - x[k] - (f[k] + f[k + 1]) * half_step);
            }
        }
        Ok(defects)
    }

    /// [`trapezoidal_defects`](Self::trapezoidal_defects) as equality
    /// constraints.
    pub fn collocation_constraints(
        &self,
        rates: &Self,
        dt: T,
    ) -> Result<Vec<Constraint<T>>, VariableBindingError> {
        Ok(self
            .trapezoidal_defects(rates, dt)?
            .into_iter()
            .map(|defect| Constraint::equal(defect, T::zero()))
            .collect())
    }
}

/// Decision variables for every field of a trajectory at every node.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryVariables {
    kind: Representation,
    fields: Vec<Vec<Var>>,
}

impl TrajectoryVariables {
    /// Declares one free variable per field and node, seeded from `guess`.
    pub fn declare<C: OptimizationContext + ?Sized>(context: &mut C, guess: &Trajectory<f64>) -> Self {
        let fields = guess
            .fields
            .iter()
            .map(|series| variable_series(context, series, None, None))
            .collect();
        debug!(
            "Declared {} trajectory nodes in {:?}",
            guess.num_nodes(),
            guess.kind
        );
        Self {
            kind: guess.kind,
            fields,
        }
    }

    pub fn kind(&self) -> Representation {
        self.kind
    }

    pub fn num_nodes(&self) -> usize {
        self.fields[0].len()
    }

    pub fn field(&self, name: &str) -> Result<&[Var], VariableBindingError> {
        Ok(&self.fields[self.kind.field_index(name)?])
    }

    /// Bounds one field at every node.
    pub fn bound_field<C: OptimizationContext + ?Sized>(
        &self,
        context: &mut C,
        name: &str,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Result<(), VariableBindingError> {
        for &var in self.field(name)? {
            if let Some(value) = lower {
                context.subject_to(Bound::Lower { var, value });
            }
            if let Some(value) = upper {
                context.subject_to(Bound::Upper { var, value });
            }
        }
        Ok(())
    }

    /// Pins the state at `node`, e.g. an initial condition. `state` may be
    /// in any representation.
    pub fn pin<C: OptimizationContext + ?Sized>(
        &self,
        context: &mut C,
        node: usize,
        state: &DynamicsState<f64>,
    ) -> Result<(), VariableBindingError> {
        let values = state.convert(self.kind).state();
        for (series, value) in self.fields.iter().zip(values) {
            let var = *series.get(node).ok_or(VariableBindingError::UnknownVariable {
                index: node,
                declared: series.len(),
            })?;
            context.subject_to(Bound::Equal { var, value });
        }
        Ok(())
    }

    /// The trajectory at the current values of the variables.
    pub fn bind<T: Scalar>(&self, vars: &Bindings<T>) -> Result<Trajectory<T>, VariableBindingError> {
        let fields = self
            .fields
            .iter()
            .map(|series| vars.values_of(series))
            .collect::<Result<Vec<_>, _>>()?;
        Trajectory::new(self.kind, fields)
    }
}
