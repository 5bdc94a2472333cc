//! PLU factorization with partial pivoting, in place

use crate::config::SolverConfig;
use crate::error::{Phase, Result};
use crate::pivot::{FactorReport, PivotGuard, select_pivot, swap_rows};
use crate::storage::{check_len, check_square, init_identity, max_abs};
use crate::traits::RealField;
use ndarray::{ArrayBase, DataMut, Ix2};

/// Factorize `a` as `P·A = L·U`, overwriting it with the packed factors.
///
/// On return `a` holds U in its upper triangle (diagonal included) and the
/// multipliers of L below the diagonal; L's unit diagonal is not stored.
/// `perm[i]` names the original row now at position `i`.
///
/// A zero pivot stops elimination at that column with
/// [`GaussError::SingularMatrix`](crate::GaussError::SingularMatrix). `a` and
/// `perm` are then partially updated and must be re-initialised before reuse.
///
/// # Example
///
/// ```
/// use math_audio_gauss::{SolverConfig, factorize_plu};
/// use ndarray::array;
///
/// let mut a = array![[0.0_f64, 1.0], [2.0, 3.0]];
/// let mut perm = [0usize; 2];
/// factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap();
/// assert_eq!(perm, [1, 0]);
/// assert_eq!(a, array![[2.0, 3.0], [0.0, 1.0]]);
/// ```
pub fn factorize_plu<T, S>(
    a: &mut ArrayBase<S, Ix2>,
    perm: &mut [usize],
    config: &SolverConfig,
) -> Result<FactorReport>
where
    T: RealField,
    S: DataMut<Elem = T>,
{
    let n = check_square(a)?;
    check_len(n, perm.len())?;

    init_identity(perm);
    let guard = PivotGuard::new(config, max_abs(a), Phase::Factorization);
    let mut report = FactorReport::new();

    for k in 0..n {
        let pivot_row = select_pivot(a, k);
        if pivot_row != k {
            log::trace!("pivot column {}: swapping rows {} and {}", k, k, pivot_row);
            swap_rows(a, perm, k, pivot_row);
            report.swaps += 1;
        }

        let pivot = a[[k, k]];
        guard.check(k, pivot, &mut report)?;

        for i in (k + 1)..n {
            let mult = a[[i, k]] / pivot;
            a[[i, k]] = mult;
            if mult == T::zero() {
                continue;
            }
            for j in (k + 1)..n {
                let update = mult * a[[k, j]];
                a[[i, j]] -= update;
            }
        }
    }

    log::debug!(
        "PLU factorization of order {} done: {} swaps, min pivot {:.3e}",
        n,
        report.swaps,
        report.min_pivot
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GaussError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_plu_no_swap_needed() {
        let mut a = array![[4.0_f64, 3.0, 2.0], [2.0, 1.0, 1.0], [3.0, 2.0, 1.0]];
        let mut perm = [0usize; 3];
        let report = factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap();

        assert_eq!(perm, [0, 1, 2]);
        assert_eq!(report.swaps, 0);
        let expected = array![[4.0, 3.0, 2.0], [0.5, -0.5, 0.0], [0.75, 0.5, -0.5]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[[i, j]], expected[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_plu_swaps_full_rows() {
        let mut a = array![[2.0_f64, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
        let mut perm = [0usize; 3];
        let report = factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap();

        assert_eq!(perm, [1, 2, 0]);
        assert_eq!(report.swaps, 2);
        assert!(report.is_even());
        // Multiplier 0.5 from column 0 travelled with its row during the second swap.
        let expected = array![[4.0, 1.0, 2.0], [-0.5, 7.5, 3.0], [0.5, 1.0 / 3.0, -3.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[[i, j]], expected[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_plu_zero_row_is_singular() {
        let mut a = array![[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0], [0.0, 0.0, 0.0]];
        let mut perm = [0usize; 3];
        let err = factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GaussError::SingularMatrix {
                column: 2,
                phase: Phase::Factorization
            }
        );
    }

    #[test]
    fn test_plu_zero_column_is_singular() {
        let mut a = array![[0.0_f64, 1.0], [0.0, 2.0]];
        let mut perm = [0usize; 2];
        let err = factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap_err();
        assert_eq!(err.column(), Some(0));
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_plu_rejects_bad_permutation_length() {
        let mut a = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let mut perm = [0usize; 3];
        let err = factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GaussError::InvalidDimensions {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_plu_one_by_one() {
        let mut a = array![[-3.0_f64]];
        let mut perm = [7usize];
        factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap();
        assert_eq!(perm, [0]);
        assert_eq!(a[[0, 0]], -3.0);
    }

    #[test]
    fn test_plu_f32() {
        let mut a = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let mut perm = [0usize; 2];
        factorize_plu(&mut a, &mut perm, &SolverConfig::default()).unwrap();
        assert_eq!(perm, [1, 0]);
        assert_relative_eq!(a[[1, 0]], 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(a[[1, 1]], 2.0 - 4.0 / 3.0, epsilon = 1e-6);
    }
}
