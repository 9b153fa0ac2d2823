use super::{Bindings, Scalar};
use crate::utils::Result;

/// A general constraint on an expression of the variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint<T> {
    /// `g == 0`
    Equality(T),
    /// `g <= 0`
    Inequality(T),
}

impl<T: Scalar> Constraint<T> {
    /// `lhs == rhs`
    pub fn equal(lhs: T, rhs: T) -> Self {
        Constraint::Equality(lhs - rhs)
    }

    /// `lhs <= rhs`
    pub fn less_equal(lhs: T, rhs: T) -> Self {
        Constraint::Inequality(lhs - rhs)
    }

    /// `lhs >= rhs`
    pub fn greater_equal(lhs: T, rhs: T) -> Self {
        Constraint::Inequality(rhs - lhs)
    }

    /// Residual that is zero exactly when the constraint holds.
    pub fn residual(&self) -> T {
        match *self {
            Constraint::Equality(g) => g,
            Constraint::Inequality(g) => {
                if g.value() > 0.0 {
                    g
                } else {
                    T::zero()
                }
            }
        }
    }

    pub fn violation(&self) -> f64 {
        self.residual().value().abs()
    }
}

/// A nonlinear program over the variables of an optimization context.
///
/// Both methods are generic over the scalar type: the context evaluates them
/// with `f64` for values and with dual numbers for gradients, so the model
/// they build (geometry, aerodynamics, dynamics) must only use [`Scalar`]
/// operations on what it pulls out of the bindings.
pub trait Problem {
    /// Quantity to minimize.
    fn objective<T: Scalar>(&self, vars: &Bindings<T>) -> Result<T>;

    /// Constraints beyond simple variable bounds.
    fn constraints<T: Scalar>(&self, _vars: &Bindings<T>) -> Result<Vec<Constraint<T>>> {
        Ok(Vec::new())
    }
}
