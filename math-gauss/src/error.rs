//! Error types for factorization and substitution.
//!
//! Dimension problems are rejected once, at entry. Singularity is reported at
//! the exact elimination step (or back-substitution row) where it shows up, so
//! callers learn which pivot column failed.

use std::fmt;
use thiserror::Error;

/// Which part of the solve path detected a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// LU or PLU elimination.
    Factorization,
    /// Division by the diagonal of U while back-substituting.
    BackSubstitution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Factorization => write!(f, "factorization"),
            Phase::BackSubstitution => write!(f, "back substitution"),
        }
    }
}

/// Errors that can occur while factorizing or solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaussError {
    /// A pivot is zero (or at/below the configured singular tolerance).
    #[error("matrix is singular: zero pivot in column {column} during {phase}")]
    SingularMatrix {
        /// Pivot column where elimination could not continue
        column: usize,
        /// Phase that detected the zero pivot
        phase: Phase,
    },

    /// A pivot is nonzero but tiny relative to the matrix scale.
    ///
    /// Only returned when the configuration asks for ill-conditioned inputs to
    /// be rejected; otherwise it is reported through
    /// [`Conditioning`](crate::Conditioning).
    #[error("matrix is ill-conditioned: pivot {pivot:e} in column {column} is below threshold {threshold:e}")]
    IllConditioned {
        /// Pivot column
        column: usize,
        /// Magnitude of the offending pivot
        pivot: f64,
        /// Threshold it fell under (ratio times scale)
        threshold: f64,
    },

    /// Matrix has no rows.
    #[error("matrix order must be at least 1")]
    EmptyMatrix,

    /// Matrix is not square.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A vector or buffer length does not match the matrix order.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    InvalidDimensions {
        /// Required length
        expected: usize,
        /// Length that was supplied
        got: usize,
    },

    /// A permutation vector is not a bijection on `[0, n)`.
    #[error("permutation is not a bijection on [0, {order}): entry {index} breaks it")]
    InvalidPermutation {
        /// Matrix order
        order: usize,
        /// Position where the walk left the valid range or failed to close
        index: usize,
    },

    /// Invalid or unreadable solver configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, GaussError>;

impl GaussError {
    /// Returns `true` if the matrix could not be factored or solved.
    pub fn is_singular(&self) -> bool {
        matches!(self, GaussError::SingularMatrix { .. })
    }

    /// Returns `true` if a near-singular pivot was rejected.
    pub fn is_ill_conditioned(&self) -> bool {
        matches!(self, GaussError::IllConditioned { .. })
    }

    /// Returns `true` for shape or length errors caught at entry.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            GaussError::EmptyMatrix
                | GaussError::NotSquare { .. }
                | GaussError::InvalidDimensions { .. }
                | GaussError::InvalidPermutation { .. }
        )
    }

    /// Pivot column associated with the error, if any.
    pub fn column(&self) -> Option<usize> {
        match self {
            GaussError::SingularMatrix { column, .. }
            | GaussError::IllConditioned { column, .. } => Some(*column),
            _ => None,
        }
    }
}
