//! Core traits for the dense solver
//!
//! [`RealField`] abstracts over the real floating-point types the factorization
//! routines accept. The routines only ever need ordering by magnitude, the four
//! arithmetic operations and conversions to and from the `f64` tolerances kept
//! in [`SolverConfig`](crate::SolverConfig).

use ndarray::LinalgScalar;
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types that can be factorized.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (the default, double precision)
/// - `f32` (for memory-constrained callers)
pub trait RealField:
    Float
    + NumAssign
    + FromPrimitive
    + ToPrimitive
    + LinalgScalar
    + Send
    + Sync
    + Debug
    + Display
    + 'static
{
    /// Convert an `f64` tolerance into this type, rounding if needed.
    fn from_f64_lossy(v: f64) -> Self;

    /// Widen to `f64` for error reporting and logging.
    fn to_f64_lossy(self) -> f64;

    /// Check whether the magnitude is at or below `tol`.
    ///
    /// A zero tolerance makes this an exact-zero test.
    #[inline]
    fn is_negligible(&self, tol: Self) -> bool {
        self.abs() <= tol
    }
}

impl RealField for f64 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl RealField for f32 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}
