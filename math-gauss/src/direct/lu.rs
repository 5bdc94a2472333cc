//! Unpivoted LU factorization and its inverse
//!
//! [`factorize_lu`] builds the packed factors column by column as explicit
//! dot-product accumulations (Doolittle order) instead of row elimination.
//! [`reconstruct_lu`] replays those exact updates backwards to recover `L·U`,
//! which is what the round-trip tests rely on.
//!
//! No rows are exchanged, so only use this on matrices that are known to be
//! pivot-safe (for example diagonally dominant ones). Use
//! [`factorize_plu`](super::factorize_plu) otherwise.

use crate::config::SolverConfig;
use crate::error::{Phase, Result};
use crate::pivot::{FactorReport, PivotGuard};
use crate::storage::{check_square, max_abs};
use crate::traits::RealField;
use ndarray::{ArrayBase, DataMut, Ix2};

/// Factorize `a = L·U` in place without pivoting.
///
/// For each step `k` the row `k` of U is completed first (columns `k..n`),
/// then the pivot `a[[k, k]]` is checked, then column `k` of L (rows
/// `k+1..n`) is completed and divided by the pivot.
pub fn factorize_lu<T, S>(a: &mut ArrayBase<S, Ix2>, config: &SolverConfig) -> Result<FactorReport>
where
    T: RealField,
    S: DataMut<Elem = T>,
{
    let n = check_square(a)?;
    let guard = PivotGuard::new(config, max_abs(a), Phase::Factorization);
    let mut report = FactorReport::new();

    for k in 0..n {
        // U row k
        for i in k..n {
            let mut sum = a[[k, i]];
            for j in 0..k {
                sum -= a[[k, j]] * a[[j, i]];
            }
            a[[k, i]] = sum;
        }

        let pivot = a[[k, k]];
        guard.check(k, pivot, &mut report)?;

        // L column k
        for i in (k + 1)..n {
            let mut sum = a[[i, k]];
            for j in 0..k {
                sum -= a[[i, j]] * a[[j, k]];
            }
            a[[i, k]] = sum / pivot;
        }
    }

    log::debug!(
        "LU factorization of order {} done: min pivot {:.3e}",
        n,
        report.min_pivot
    );
    Ok(report)
}

/// Overwrite packed LU factors with their product `L·U`.
///
/// Runs the updates of [`factorize_lu`] in reverse pivot order: column `k` of
/// L is restored first (it needs U's diagonal entry `a[[k, k]]` untouched),
/// then row `k` of U. Entries consumed by step `k` are only modified by
/// earlier steps, so they are still factor values when step `k` is undone.
///
/// `a` must hold valid packed factors; there is no failure path.
pub fn reconstruct_lu<T, S>(a: &mut ArrayBase<S, Ix2>)
where
    T: RealField,
    S: DataMut<Elem = T>,
{
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols(), "reconstruction requires a square matrix");

    for k in (0..n).rev() {
        let pivot = a[[k, k]];
        for i in (k + 1)..n {
            let mut sum = a[[i, k]] * pivot;
            for j in 0..k {
                sum += a[[i, j]] * a[[j, k]];
            }
            a[[i, k]] = sum;
        }

        for i in k..n {
            let mut sum = a[[k, i]];
            for j in 0..k {
                sum += a[[k, j]] * a[[j, i]];
            }
            a[[k, i]] = sum;
        }
    }
}
