//! JSON configuration for pivot tolerances and problem files

use crate::error::{GaussError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pivot tolerances shared by factorization and substitution.
///
/// The defaults are strict about exact zeros and lenient about tiny pivots:
/// a pivot of exactly zero is an error, a pivot below
/// `ill_conditioned_ratio` times the matrix scale is only reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Pivots with magnitude at or below this value are treated as zero
    #[serde(default = "default_singular_tolerance")]
    pub singular_tolerance: f64,
    /// Relative threshold (pivot / scale) below which a pivot is ill-conditioned
    #[serde(default = "default_ill_conditioned_ratio")]
    pub ill_conditioned_ratio: f64,
    /// Turn ill-conditioned pivots into hard errors
    #[serde(default)]
    pub reject_ill_conditioned: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: default_singular_tolerance(),
            ill_conditioned_ratio: default_ill_conditioned_ratio(),
            reject_ill_conditioned: false,
        }
    }
}

fn default_singular_tolerance() -> f64 {
    0.0
}

fn default_ill_conditioned_ratio() -> f64 {
    1e-12
}

impl SolverConfig {
    /// Configuration that rejects ill-conditioned pivots instead of reporting them.
    pub fn strict() -> Self {
        Self {
            reject_ill_conditioned: true,
            ..Self::default()
        }
    }

    /// Check that tolerances are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.singular_tolerance.is_finite() || self.singular_tolerance < 0.0 {
            return Err(GaussError::Config(format!(
                "singular_tolerance must be finite and >= 0, got {}",
                self.singular_tolerance
            )));
        }
        if !self.ill_conditioned_ratio.is_finite() || self.ill_conditioned_ratio < 0.0 {
            return Err(GaussError::Config(format!(
                "ill_conditioned_ratio must be finite and >= 0, got {}",
                self.ill_conditioned_ratio
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)
            .map_err(|e| GaussError::Config(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GaussError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }
}

/// A linear system read from JSON: `{"matrix": [[..]], "rhs": [..], "solver": {..}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Coefficient matrix as a list of rows
    pub matrix: Vec<Vec<f64>>,
    /// Optional right-hand side
    #[serde(default)]
    pub rhs: Option<Vec<f64>>,
    /// Pivot tolerances
    #[serde(default)]
    pub solver: SolverConfig,
}

impl ProblemConfig {
    /// Parse a problem from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let problem: ProblemConfig = serde_json::from_str(json)
            .map_err(|e| GaussError::Config(format!("Failed to parse JSON: {}", e)))?;
        problem.solver.validate()?;
        Ok(problem)
    }

    /// Load a problem from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GaussError::Config(format!("Failed to read problem file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Convert to ndarray storage, checking that the matrix is square and the
    /// right-hand side (if any) matches its order.
    pub fn to_arrays(&self) -> Result<(Array2<f64>, Option<Array1<f64>>)> {
        let n = self.matrix.len();
        if n == 0 {
            return Err(GaussError::EmptyMatrix);
        }
        if let Some(row) = self.matrix.iter().find(|row| row.len() != n) {
            return Err(GaussError::NotSquare {
                rows: n,
                cols: row.len(),
            });
        }

        let flat: Vec<f64> = self.matrix.iter().flatten().copied().collect();
        let a = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| GaussError::Config(format!("Failed to build matrix: {}", e)))?;

        let b = match &self.rhs {
            Some(rhs) if rhs.len() != n => {
                return Err(GaussError::InvalidDimensions {
                    expected: n,
                    got: rhs.len(),
                });
            }
            Some(rhs) => Some(Array1::from_vec(rhs.clone())),
            None => None,
        };

        Ok((a, b))
    }
}
