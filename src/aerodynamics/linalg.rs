use nalgebra::{DMatrix, DVector};

use crate::optimization::Scalar;
use crate::utils::SolverError;

/// Solves the dense system `a x = b` by Gaussian elimination with partial
/// pivoting.
///
/// Pivots are chosen on primal values, so a dual-number solve takes the
/// same elimination path as the plain one. A pivot no larger than
/// `tolerance` times the largest entry of `a` makes the system singular.
pub fn solve_dense<T: Scalar>(
    mut a: DMatrix<T>,
    mut b: DVector<T>,
    tolerance: f64,
) -> Result<DVector<T>, SolverError> {
    let n = a.nrows();
    if n == 0 {
        return Err(SolverError::NoPanels);
    }
    if a.ncols() != n || b.len() != n {
        return Err(SolverError::NonFinite(format!(
            "{}x{} system with {} right-hand sides",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    let scale = a.iter().map(|x| x.value().abs()).fold(0.0, f64::max);
    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
        return Err(SolverError::NonFinite("influence system".to_string()));
    }
    let threshold = tolerance * scale;

    for column in 0..n {
        let (pivot_row, pivot) = (column..n)
            .map(|row| (row, a[(row, column)].value().abs()))
            .fold((column, -1.0), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });
        if pivot <= threshold {
            return Err(SolverError::SingularSystem {
                row: column,
                pivot,
            });
        }
        if pivot_row != column {
            a.swap_rows(pivot_row, column);
            b.swap_rows(pivot_row, column);
        }

        let diagonal = a[(column, column)];
        for row in column + 1..n {
            let factor = a[(row, column)] / diagonal;
            if factor.is_zero() {
                continue;
            }
            for k in column..n {
                let update = factor * a[(column, k)];
                a[(row, k)] -= update;
            }
            let update = factor * b[column];
            b[row] -= update;
        }
    }

    let mut x = DVector::from_element(n, T::zero());
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[(row, k)] * x[k];
        }
        x[row] = sum / a[(row, row)];
    }
    Ok(x)
}
