use num_traits::{One, Zero};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A numeric value flowing through geometry, aerodynamics and dynamics.
///
/// Every attribute of the model is generic over this trait so that the same
/// code path evaluates plain numbers (`f64`) and differentiable numbers
/// ([`Dual`](super::Dual)). Code written against `Scalar` never asks which
/// of the two it holds; comparisons go through [`Scalar::value`].
pub trait Scalar:
    nalgebra::Scalar
    + Copy
    + Default
    + Send
    + Sync
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + Sum
{
    /// Lift a constant into this scalar type.
    fn from_f64(value: f64) -> Self;

    /// The primal (plain numeric) part.
    fn value(self) -> f64;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn exp(self) -> Self;
    fn abs(self) -> Self;
    fn powi(self, n: i32) -> Self;

    /// Four-quadrant arctangent of `self / other`.
    fn atan2(self, other: Self) -> Self;

    fn is_finite(self) -> bool {
        self.value().is_finite()
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(self) -> f64 {
        self
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn sin(self) -> Self {
        f64::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        f64::cos(self)
    }

    #[inline]
    fn tan(self) -> Self {
        f64::tan(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }

    #[inline]
    fn atan2(self, other: Self) -> Self {
        f64::atan2(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::Dual;
    use approx::assert_relative_eq;

    fn describe<T: Scalar>(x: T) -> (String, f64) {
        let y = x.sin() * x.cos() + x.powi(2).sqrt() - x.atan2(T::one());
        (format!("{:?}", y), y.value())
    }

    #[test]
    fn test_generic_code_runs_on_both_scalars() {
        let (plain_text, plain) = describe(0.7);
        let (dual_text, dual) = describe(Dual::variable(0.7));

        assert_relative_eq!(plain, dual, epsilon = 1e-15);
        assert!(dual_text.contains("Dual"));
        assert_eq!(plain_text, format!("{:?}", plain));
        assert_relative_eq!(plain, 0.7f64.sin() * 0.7f64.cos() + 0.7 - 0.7f64.atan2(1.0));
    }
}
