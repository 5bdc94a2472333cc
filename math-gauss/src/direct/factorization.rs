//! Owned PLU factorization
//!
//! Convenience layer over the in-place routines for callers that want to keep
//! the factors around and solve for several right-hand sides. Unlike the
//! in-place routines these allocate: the input matrix is copied once and each
//! solve returns a fresh vector.

use super::plu::factorize_plu;
use super::substitution::solve;
use crate::config::SolverConfig;
use crate::error::{GaussError, Result};
use crate::pivot::{Conditioning, FactorReport};
use crate::storage::check_len;
use crate::traits::RealField;
use ndarray::{Array1, Array2, ArrayBase, DataMut, Ix1, Ix2};

/// PLU factorization result
///
/// Stores the packed L and U factors along with the row permutation.
#[derive(Debug, Clone)]
pub struct PluFactorization<T: RealField> {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    lu: Array2<T>,
    /// `permutation[i]` is the original row at position `i`
    permutation: Vec<usize>,
    /// Pivot summary from the factorization
    report: FactorReport,
    /// Tolerances reused by every solve
    config: SolverConfig,
}

impl<T: RealField> PluFactorization<T> {
    /// Factorize a copy of `a`.
    pub fn new(a: &Array2<T>, config: &SolverConfig) -> Result<Self> {
        let mut lu = a.clone();
        let mut permutation = vec![0; a.nrows()];
        let report = factorize_plu(&mut lu, &mut permutation, config)?;
        Ok(Self {
            lu,
            permutation,
            report,
            config: config.clone(),
        })
    }

    /// Matrix order
    pub fn order(&self) -> usize {
        self.lu.nrows()
    }

    /// Packed factors
    pub fn packed(&self) -> &Array2<T> {
        &self.lu
    }

    /// Row permutation
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Pivot summary
    pub fn report(&self) -> &FactorReport {
        &self.report
    }

    /// Unit lower triangular factor L with explicit zeros and ones.
    pub fn lower(&self) -> Array2<T> {
        let n = self.order();
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i > j {
                self.lu[[i, j]]
            } else if i == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Upper triangular factor U with explicit zeros below the diagonal.
    pub fn upper(&self) -> Array2<T> {
        let n = self.order();
        Array2::from_shape_fn((n, n), |(i, j)| if i <= j { self.lu[[i, j]] } else { T::zero() })
    }

    /// Permutation matrix P such that `P·A = L·U`.
    pub fn permutation_matrix(&self) -> Array2<T> {
        let n = self.order();
        let mut p = Array2::zeros((n, n));
        for (i, &row) in self.permutation.iter().enumerate() {
            p[[i, row]] = T::one();
        }
        p
    }

    /// Determinant of the original matrix.
    ///
    /// Product of U's diagonal, negated for an odd number of row swaps.
    pub fn determinant(&self) -> T {
        let det = self.lu.diag().iter().fold(T::one(), |acc, &d| acc * d);
        if self.report.is_even() { det } else { -det }
    }

    /// Solve `A·x = b` using the pre-computed factorization
    ///
    /// Returns only the solution; use [`solve_in_place`](Self::solve_in_place)
    /// to also get the back-substitution conditioning verdict.
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        check_len(self.order(), b.len())?;
        let mut x = b.clone();
        solve(&self.lu, &mut x, Some(self.permutation.as_slice()), &self.config)?;
        Ok(x)
    }

    /// Solve in place, overwriting `b` with the solution.
    ///
    /// Returns the conditioning verdict of the back substitution.
    pub fn solve_in_place<V>(&self, b: &mut ArrayBase<V, Ix1>) -> Result<Conditioning>
    where
        V: DataMut<Elem = T>,
    {
        solve(&self.lu, b, Some(self.permutation.as_slice()), &self.config)
    }
}

/// Factorize `a` with pivoting and solve for `b`, all in the caller's buffers.
///
/// On success `a` holds the packed factors, `perm` the row permutation and
/// `b` the solution. The report's conditioning is the first ill-conditioned
/// pivot found by the factorization, or failing that by the back substitution.
pub fn gauss_solve_in_place<T, S, V>(
    a: &mut ArrayBase<S, Ix2>,
    b: &mut ArrayBase<V, Ix1>,
    perm: &mut [usize],
    config: &SolverConfig,
) -> Result<FactorReport>
where
    T: RealField,
    S: DataMut<Elem = T>,
    V: DataMut<Elem = T>,
{
    if a.nrows() != b.len() {
        return Err(GaussError::InvalidDimensions {
            expected: a.nrows(),
            got: b.len(),
        });
    }
    let mut report = factorize_plu(a, perm, config)?;
    let conditioning = solve(a, b, Some(&*perm), config)?;
    if report.conditioning.is_well_conditioned() {
        report.conditioning = conditioning;
    }
    Ok(report)
}

/// Solve Ax = b using PLU decomposition
///
/// This is a convenience function that combines factorization and solve with
/// default tolerances.
pub fn lu_solve<T: RealField>(a: &Array2<T>, b: &Array1<T>) -> Result<Array1<T>> {
    let factorization = PluFactorization::new(a, &SolverConfig::default())?;
    factorization.solve(b)
}
