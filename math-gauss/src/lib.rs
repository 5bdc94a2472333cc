//! Dense linear solvers built on in-place LU factorization
//!
//! This crate factorizes square matrices in the caller's own storage and
//! solves linear systems from the packed factors.
//!
//! # Features
//!
//! - **PLU factorization**: partial pivoting by column, `P·A = L·U`
//! - **Unpivoted LU**: Doolittle accumulation for pivot-safe matrices, with an
//!   exact inverse ([`reconstruct_lu`]) for round-trip checks
//! - **Substitution**: forward/back substitution overwriting the right-hand side
//! - **Explicit failures**: zero pivots are reported with the failing column,
//!   ill-conditioned pivots are reported or rejected per [`SolverConfig`]
//! - **Generic scalar types**: works with f64 and f32
//!
//! The in-place routines never allocate and keep no state between calls, so
//! independent matrices can be factorized concurrently from different threads.
//!
//! # Example
//!
//! ```
//! use math_audio_gauss::{SolverConfig, factorize_plu, solve};
//! use ndarray::array;
//!
//! let mut a = array![[2.0_f64, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
//! let mut b = array![5.0_f64, 6.0, 3.0];
//! let mut perm = [0usize; 3];
//! let config = SolverConfig::default();
//!
//! factorize_plu(&mut a, &mut perm, &config)?;
//! solve(&a, &mut b, Some(&perm[..]), &config)?;
//!
//! assert!((b[0] - 1.3).abs() < 1e-12);
//! assert!((b[1] - 0.8).abs() < 1e-12);
//! assert!(b[2].abs() < 1e-12);
//! # Ok::<(), math_audio_gauss::GaussError>(())
//! ```

pub mod config;
pub mod direct;
pub mod error;
pub mod pivot;
pub mod storage;
pub mod traits;
pub mod verify;

// Re-export main types
pub use config::{ProblemConfig, SolverConfig};
pub use error::{GaussError, Phase, Result};
pub use pivot::{Conditioning, FactorReport};
pub use traits::RealField;

// Re-export direct solvers
pub use direct::{
    PluFactorization, factorize_lu, factorize_plu, gauss_solve_in_place, lu_solve, reconstruct_lu,
    solve,
};
