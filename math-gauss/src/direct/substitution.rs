//! Forward and back substitution on packed factors
//!
//! The solve path moves through these states, each transition owned by one
//! function below:
//!
//! ```text
//! Unfactored -> Factored -> Permuted-RHS-Applied -> ForwardSolved -> BackSolved
//! ```
//!
//! A failure leaves the right-hand side partially updated; it must be
//! re-initialised before it is used again.

use crate::config::SolverConfig;
use crate::error::{Phase, Result};
use crate::pivot::{Conditioning, FactorReport, PivotGuard};
use crate::storage::{apply_permutation, check_len, check_square};
use crate::traits::RealField;
use ndarray::{ArrayBase, Data, DataMut, Ix1, Ix2};

/// Solve `A·x = b` in place from packed factors.
///
/// `lu` holds the output of [`factorize_plu`](super::factorize_plu) or
/// [`factorize_lu`](super::factorize_lu). When `perm` is given the right-hand
/// side is permuted first (`b[i] <- b[perm[i]]`); pass `None` for unpivoted
/// factors or when `b` has already been permuted. On success `b` holds `x`
/// and the returned [`Conditioning`] says whether a diagonal entry of U fell
/// below the ill-conditioning threshold.
///
/// Returns [`GaussError::SingularMatrix`](crate::GaussError::SingularMatrix)
/// with [`Phase::BackSubstitution`] if a diagonal entry of U is zero.
pub fn solve<T, S, V>(
    lu: &ArrayBase<S, Ix2>,
    b: &mut ArrayBase<V, Ix1>,
    perm: Option<&[usize]>,
    config: &SolverConfig,
) -> Result<Conditioning>
where
    T: RealField,
    S: Data<Elem = T>,
    V: DataMut<Elem = T>,
{
    let n = check_square(lu)?;
    check_len(n, b.len())?;

    if let Some(perm) = perm {
        check_len(n, perm.len())?;
        apply_permutation(perm, b)?;
    }

    forward_substitute(lu, b);
    back_substitute(lu, b, config)
}

/// Solve `L·y = b` in place, L unit lower triangular.
///
/// No division: L's diagonal is implicitly one.
pub fn forward_substitute<T, S, V>(lu: &ArrayBase<S, Ix2>, b: &mut ArrayBase<V, Ix1>)
where
    T: RealField,
    S: Data<Elem = T>,
    V: DataMut<Elem = T>,
{
    let n = lu.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= lu[[i, j]] * b[j];
        }
        b[i] = sum;
    }
}

/// Solve `U·x = y` in place, checking every diagonal entry before dividing.
///
/// The ill-conditioning threshold is scaled by the largest diagonal magnitude
/// of U. The first diagonal under it is returned as
/// [`Conditioning::IllConditioned`] unless the configuration rejects it.
pub fn back_substitute<T, S, V>(
    lu: &ArrayBase<S, Ix2>,
    b: &mut ArrayBase<V, Ix1>,
    config: &SolverConfig,
) -> Result<Conditioning>
where
    T: RealField,
    S: Data<Elem = T>,
    V: DataMut<Elem = T>,
{
    let n = lu.nrows();
    let scale = lu.diag().iter().fold(T::zero(), |acc, &d| acc.max(d.abs()));
    let guard = PivotGuard::new(config, scale, Phase::BackSubstitution);
    let mut report = FactorReport::new();

    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= lu[[i, j]] * b[j];
        }
        let diag = lu[[i, i]];
        guard.check(i, diag, &mut report)?;
        b[i] = sum / diag;
    }
    Ok(report.conditioning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::{factorize_lu, factorize_plu};
    use crate::error::GaussError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_solve_after_plu() {
        let a0 = array![[2.0_f64, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
        let mut lu = a0.clone();
        let mut perm = [0usize; 3];
        let config = SolverConfig::default();
        factorize_plu(&mut lu, &mut perm, &config).unwrap();

        let mut b = array![5.0_f64, 6.0, 3.0];
        let conditioning = solve(&lu, &mut b, Some(&perm[..]), &config).unwrap();
        assert!(conditioning.is_well_conditioned());

        assert_relative_eq!(b[0], 1.3, epsilon = 1e-12);
        assert_relative_eq!(b[1], 0.8, epsilon = 1e-12);
        assert_relative_eq!(b[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_after_lu_without_permutation() {
        let a0 = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let mut lu = a0.clone();
        let config = SolverConfig::default();
        factorize_lu(&mut lu, &config).unwrap();

        let mut b = array![1.0_f64, 2.0];
        solve(&lu, &mut b, None, &config).unwrap();

        let ax = a0.dot(&b);
        assert_relative_eq!(ax[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ax[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_substitute_unit_diagonal() {
        // Diagonal and upper entries are ignored by the forward phase.
        let lu = array![[9.0_f64, 9.0], [2.0, 9.0]];
        let mut b = array![1.0_f64, 5.0];
        forward_substitute(&lu, &mut b);
        assert_eq!(b, array![1.0, 3.0]);
    }

    #[test]
    fn test_back_substitute_zero_diagonal() {
        let lu = array![[1.0_f64, 2.0], [0.0, 0.0]];
        let mut b = array![1.0_f64, 1.0];
        let err = back_substitute(&lu, &mut b, &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GaussError::SingularMatrix {
                column: 1,
                phase: Phase::BackSubstitution
            }
        );
        assert!(b.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_solve_rhs_length_mismatch() {
        let lu = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let mut b = array![1.0_f64, 2.0, 3.0];
        let err = solve(&lu, &mut b, None, &SolverConfig::default()).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_solve_rejects_invalid_permutation() {
        let lu = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let mut b = array![1.0_f64, 2.0];
        let err = solve(&lu, &mut b, Some(&[1, 1][..]), &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, GaussError::InvalidPermutation { .. }));
    }

    #[test]
    fn test_solve_reports_tiny_diagonal() {
        let lu = array![[1.0_f64, 0.0], [0.0, 1e-13]];
        let mut b = array![1.0_f64, 1.0];
        let conditioning = solve(&lu, &mut b, None, &SolverConfig::default()).unwrap();
        match conditioning {
            Conditioning::IllConditioned {
                column,
                pivot,
                threshold,
            } => {
                assert_eq!(column, 1);
                assert_relative_eq!(pivot, 1e-13);
                assert_relative_eq!(threshold, 1e-12);
            }
            Conditioning::WellConditioned => panic!("expected ill-conditioned verdict"),
        }
        assert_relative_eq!(b[1], 1e13, max_relative = 1e-12);

        let mut b = array![1.0_f64, 1.0];
        let err = solve(&lu, &mut b, None, &SolverConfig::strict()).unwrap_err();
        assert!(err.is_ill_conditioned());
        assert_eq!(err.column(), Some(1));
    }
}
