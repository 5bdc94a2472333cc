//! Direct solvers for dense linear systems
//!
//! This module provides the in-place factorizations and the substitution
//! solve that consumes them:
//! - [`factorize_plu`]: LU decomposition with partial pivoting
//! - [`factorize_lu`] / [`reconstruct_lu`]: unpivoted LU and its inverse
//! - [`solve`]: forward/back substitution on packed factors
//! - [`PluFactorization`], [`lu_solve`]: owned convenience wrappers

mod factorization;
mod lu;
mod plu;
mod substitution;

pub use factorization::{PluFactorization, gauss_solve_in_place, lu_solve};
pub use lu::{factorize_lu, reconstruct_lu};
pub use plu::factorize_plu;
pub use substitution::{back_substitute, forward_substitute, solve};
