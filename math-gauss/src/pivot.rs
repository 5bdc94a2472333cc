//! Partial pivoting and pivot checks
//!
//! [`select_pivot`] and [`swap_rows`] implement the row interchange used by
//! the PLU factorization. [`PivotGuard`] applies the tolerances from
//! [`SolverConfig`] to every pivot the factorization or back substitution is
//! about to divide by.

use crate::config::SolverConfig;
use crate::error::{GaussError, Phase, Result};
use crate::traits::RealField;
use ndarray::{ArrayBase, Data, DataMut, Ix2};

/// Return the row in `k..n` whose entry in column `k` has the largest magnitude.
///
/// Ties keep the earliest row: the running maximum is only replaced on a
/// strictly larger value.
pub fn select_pivot<T, S>(a: &ArrayBase<S, Ix2>, k: usize) -> usize
where
    T: RealField,
    S: Data<Elem = T>,
{
    let n = a.nrows();
    debug_assert!(k < n, "pivot column {} out of range for order {}", k, n);

    let mut max_row = k;
    let mut max_val = a[[k, k]].abs();
    for i in (k + 1)..n {
        let val = a[[i, k]].abs();
        if val > max_val {
            max_val = val;
            max_row = i;
        }
    }
    max_row
}

/// Exchange rows `r1` and `r2` across all columns and mirror the exchange in `perm`.
///
/// Swapping the full row also moves the L multipliers already stored in
/// columns left of the active pivot, which keeps `P·A = L·U` intact.
pub fn swap_rows<T, S>(a: &mut ArrayBase<S, Ix2>, perm: &mut [usize], r1: usize, r2: usize)
where
    S: DataMut<Elem = T>,
{
    if r1 == r2 {
        return;
    }
    for j in 0..a.ncols() {
        a.swap([r1, j], [r2, j]);
    }
    perm.swap(r1, r2);
}

/// Conditioning verdict attached to a successful factorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conditioning {
    /// Every pivot cleared the ill-conditioning threshold.
    WellConditioned,
    /// The first pivot that fell below the threshold.
    ///
    /// The factors are valid but results derived from them may be unreliable.
    IllConditioned {
        /// Pivot column
        column: usize,
        /// Pivot magnitude
        pivot: f64,
        /// Threshold (ratio times scale)
        threshold: f64,
    },
}

impl Conditioning {
    /// Returns `true` when no pivot was flagged.
    pub fn is_well_conditioned(&self) -> bool {
        matches!(self, Conditioning::WellConditioned)
    }
}

/// Summary of a successful factorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorReport {
    /// Number of row interchanges performed (0 for unpivoted LU)
    pub swaps: usize,
    /// Smallest pivot magnitude encountered
    pub min_pivot: f64,
    /// Advisory conditioning verdict
    pub conditioning: Conditioning,
}

impl FactorReport {
    pub(crate) fn new() -> Self {
        Self {
            swaps: 0,
            min_pivot: f64::INFINITY,
            conditioning: Conditioning::WellConditioned,
        }
    }

    /// `true` when the number of row swaps is even (permutation sign +1).
    pub fn is_even(&self) -> bool {
        self.swaps % 2 == 0
    }
}

/// Applies the singular and ill-conditioning tolerances to pivots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PivotGuard<T> {
    singular_tolerance: T,
    ill_threshold: T,
    reject_ill_conditioned: bool,
    phase: Phase,
}

impl<T: RealField> PivotGuard<T> {
    /// Build a guard whose ill-conditioning threshold is `ratio * scale`.
    pub(crate) fn new(config: &SolverConfig, scale: T, phase: Phase) -> Self {
        Self {
            singular_tolerance: T::from_f64_lossy(config.singular_tolerance),
            ill_threshold: T::from_f64_lossy(config.ill_conditioned_ratio) * scale,
            reject_ill_conditioned: config.reject_ill_conditioned,
            phase,
        }
    }

    /// Check the pivot about to be divided by in `column`.
    ///
    /// Fails on a zero (or sub-tolerance) pivot. An ill-conditioned pivot
    /// fails only in strict mode; otherwise the first one is recorded in
    /// `report`.
    pub(crate) fn check(&self, column: usize, pivot: T, report: &mut FactorReport) -> Result<()> {
        let magnitude = pivot.abs();
        if !magnitude.is_finite() || pivot.is_negligible(self.singular_tolerance) {
            return Err(GaussError::SingularMatrix {
                column,
                phase: self.phase,
            });
        }

        report.min_pivot = report.min_pivot.min(magnitude.to_f64_lossy());

        if magnitude < self.ill_threshold {
            let pivot = magnitude.to_f64_lossy();
            let threshold = self.ill_threshold.to_f64_lossy();
            if self.reject_ill_conditioned {
                return Err(GaussError::IllConditioned {
                    column,
                    pivot,
                    threshold,
                });
            }
            if report.conditioning.is_well_conditioned() {
                log::warn!(
                    "ill-conditioned pivot {:.3e} in column {} during {} (threshold {:.3e})",
                    pivot,
                    column,
                    self.phase,
                    threshold
                );
                report.conditioning = Conditioning::IllConditioned {
                    column,
                    pivot,
                    threshold,
                };
            }
        }
        Ok(())
    }
}
