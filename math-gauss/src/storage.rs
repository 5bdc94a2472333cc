//! Storage conventions shared by the factorization and substitution routines
//!
//! All routines work on caller-owned `ndarray` storage and never reallocate
//! it. A packed factorization stores both triangular factors in one n×n
//! buffer:
//!
//! | entry         | holds                                   |
//! |---------------|-----------------------------------------|
//! | `a[[i, j]]`, i < j | U (strict upper part)              |
//! | `a[[i, i]]`        | U's diagonal                       |
//! | `a[[i, j]]`, i > j | L's multiplier (unit diagonal implied) |
//!
//! Flat row-major buffers (`&mut [f64]` of length n·n) are adapted with
//! [`row_major_view_mut`] without copying.

use crate::error::{GaussError, Result};
use crate::traits::RealField;
use ndarray::{ArrayBase, ArrayViewMut2, Data, DataMut, Ix1, Ix2};

/// Check that `a` is a non-empty square matrix and return its order.
pub fn check_square<T, S>(a: &ArrayBase<S, Ix2>) -> Result<usize>
where
    S: Data<Elem = T>,
{
    let (rows, cols) = a.dim();
    if rows == 0 {
        return Err(GaussError::EmptyMatrix);
    }
    if rows != cols {
        return Err(GaussError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Check that a vector or buffer has exactly `expected` entries.
#[inline]
pub fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(GaussError::InvalidDimensions { expected, got });
    }
    Ok(())
}

/// View a flat row-major buffer of `order * order` entries as a square matrix.
///
/// The view borrows `buffer` mutably; factorizing through it overwrites the
/// caller's storage in place.
pub fn row_major_view_mut<T>(order: usize, buffer: &mut [T]) -> Result<ArrayViewMut2<'_, T>> {
    if order == 0 {
        return Err(GaussError::EmptyMatrix);
    }
    let len = buffer.len();
    let expected = order
        .checked_mul(order)
        .ok_or(GaussError::InvalidDimensions {
            expected: usize::MAX,
            got: len,
        })?;
    check_len(expected, len)?;
    ArrayViewMut2::from_shape((order, order), buffer)
        .map_err(|_| GaussError::InvalidDimensions { expected, got: len })
}

/// Reset `perm` to the identity permutation.
#[inline]
pub fn init_identity(perm: &mut [usize]) {
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
}

/// Largest absolute entry of `a`, used as the scale for conditioning checks.
pub fn max_abs<T, S>(a: &ArrayBase<S, Ix2>) -> T
where
    T: RealField,
    S: Data<Elem = T>,
{
    a.iter().fold(T::zero(), |acc, &v| acc.max(v.abs()))
}

/// Check that `perm` is a bijection on `[0, perm.len())` without allocating.
///
/// Every index must return to itself by following `perm` within `n` steps.
pub fn check_permutation(perm: &[usize]) -> Result<()> {
    let n = perm.len();
    for start in 0..n {
        let mut j = start;
        let mut steps = 0;
        loop {
            let next = perm[j];
            if next >= n {
                return Err(GaussError::InvalidPermutation { order: n, index: j });
            }
            steps += 1;
            if next == start {
                break;
            }
            if steps > n {
                return Err(GaussError::InvalidPermutation {
                    order: n,
                    index: start,
                });
            }
            j = next;
        }
    }
    Ok(())
}

/// Apply a row permutation to `b` in place: afterwards `b[i]` holds the old
/// `b[perm[i]]`.
///
/// Each cycle is rotated once, starting from its smallest index, so no scratch
/// buffer is needed.
pub fn apply_permutation<T, S>(perm: &[usize], b: &mut ArrayBase<S, Ix1>) -> Result<()>
where
    T: Copy,
    S: DataMut<Elem = T>,
{
    check_len(perm.len(), b.len())?;
    check_permutation(perm)?;

    for start in 0..perm.len() {
        if !is_cycle_leader(perm, start) {
            continue;
        }
        let saved = b[start];
        let mut j = start;
        loop {
            let src = perm[j];
            if src == start {
                b[j] = saved;
                break;
            }
            b[j] = b[src];
            j = src;
        }
    }
    Ok(())
}

/// `true` when `start` is the smallest index on its cycle.
fn is_cycle_leader(perm: &[usize], start: usize) -> bool {
    let mut j = perm[start];
    while j != start {
        if j < start {
            return false;
        }
        j = perm[j];
    }
    true
}
