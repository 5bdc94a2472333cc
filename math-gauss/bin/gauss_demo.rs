//! Demo and benchmark driver for the dense LU solvers
//!
//! Runs the reference scenarios (solve, LU round trip, PLU, zero pivot,
//! singular matrix), solves a system read from JSON, or benchmarks random
//! matrices with independent trials running in parallel.
//!
//! Usage:
//!     cargo run --bin gauss-demo -- --scenario all
//!     cargo run --bin gauss-demo --release -- --random 200 --trials 8 --seed 42
//!     cargo run --bin gauss-demo -- --input math-gauss/data/reference_3x3.json

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use math_audio_gauss::verify::{
    frobenius_norm_dist, plu_residual, relative_residual, residual_norm, unpack,
};
use math_audio_gauss::{
    Conditioning, FactorReport, GaussError, ProblemConfig, SolverConfig, factorize_lu,
    factorize_plu, gauss_solve_in_place, reconstruct_lu, solve,
};
use ndarray::{Array1, Array2, array};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "gauss-demo",
    about = "Factorize and solve dense linear systems with in-place LU / PLU"
)]
struct Cli {
    /// Reference scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// JSON problem file: {"matrix": [[..]], "rhs": [..], "solver": {..}}
    #[arg(long)]
    input: Option<PathBuf>,

    /// Benchmark random matrices of this order instead of running a scenario
    #[arg(long)]
    random: Option<usize>,

    /// Number of independent benchmark trials (run in parallel)
    #[arg(long, default_value_t = 1)]
    trials: usize,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Reject ill-conditioned pivots instead of reporting them
    #[arg(long)]
    strict: bool,

    /// Pivots at or below this magnitude are treated as zero
    /// (overrides the problem file when given)
    #[arg(long)]
    singular_tolerance: Option<f64>,
}

impl Cli {
    /// Apply the tolerance flags on top of `base`; flags not given keep `base`.
    fn solver_config(&self, base: SolverConfig) -> anyhow::Result<SolverConfig> {
        let mut config = base;
        if self.strict {
            config.reject_ill_conditioned = true;
        }
        if let Some(tol) = self.singular_tolerance {
            config.singular_tolerance = tol;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
enum Scenario {
    Solve,
    LuRoundtrip,
    Plu,
    ZeroPivot,
    Singular,
    All,
}

/// Which part of a packed matrix to print.
#[derive(Copy, Clone, Debug)]
enum Part {
    Whole,
    Lower,
    Upper,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Cli::parse();

    if let Some(path) = &args.input {
        let problem = ProblemConfig::from_file(path)
            .with_context(|| format!("loading problem from {}", path.display()))?;
        let config = args.solver_config(problem.solver.clone())?;
        return run_problem(&problem, &config);
    }

    let config = args.solver_config(SolverConfig::default())?;

    if let Some(n) = args.random {
        if n == 0 {
            bail!("--random must be at least 1");
        }
        if args.trials == 0 {
            bail!("--trials must be at least 1");
        }
        return run_benchmark(n, args.trials, args.seed, &config);
    }

    let scenarios = match args.scenario {
        Scenario::All => vec![
            Scenario::Solve,
            Scenario::LuRoundtrip,
            Scenario::Plu,
            Scenario::ZeroPivot,
            Scenario::Singular,
        ],
        one => vec![one],
    };

    for scenario in scenarios {
        println!("\n=== {:?} ===", scenario);
        match scenario {
            Scenario::Solve => scenario_solve(&config)?,
            Scenario::LuRoundtrip => scenario_lu_roundtrip(&config)?,
            Scenario::Plu => scenario_plu(&config)?,
            Scenario::ZeroPivot => scenario_zero_pivot(&config)?,
            Scenario::Singular => scenario_singular(&config),
            Scenario::All => unreachable!("expanded above"),
        }
    }
    Ok(())
}

fn scenario_solve(config: &SolverConfig) -> anyhow::Result<()> {
    let a0 = array![[2.0, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
    let b0 = array![5.0, 6.0, 3.0];

    let mut a = a0.clone();
    let mut x = b0.clone();
    let mut perm = vec![0; 3];
    let report = gauss_solve_in_place(&mut a, &mut x, &mut perm, config)?;

    print_vector("x", &x);
    print_matrix("U", &a, Part::Upper);
    print_matrix("L", &a, Part::Lower);
    print_permutation(&perm);
    print_report(&report);
    println!("residual |Ax - b| = {:.3e}", residual_norm(&a0, &x, &b0));
    Ok(())
}

fn scenario_lu_roundtrip(config: &SolverConfig) -> anyhow::Result<()> {
    let a0 = array![[2.0, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
    let mut a = a0.clone();

    factorize_lu(&mut a, config)?;
    print_matrix("L", &a, Part::Lower);
    print_matrix("U", &a, Part::Upper);

    reconstruct_lu(&mut a);
    print_matrix("Reconstructed A", &a, Part::Whole);
    print_matrix("Original A", &a0, Part::Whole);
    println!("|A - LU|_F = {:.3e}", frobenius_norm_dist(&a, &a0));
    Ok(())
}

fn scenario_plu(config: &SolverConfig) -> anyhow::Result<()> {
    let a0 = array![[4.0, 3.0, 2.0], [2.0, 1.0, 1.0], [3.0, 2.0, 1.0]];
    let mut a = a0.clone();
    let mut perm = vec![0; 3];

    let report = factorize_plu(&mut a, &mut perm, config)?;
    print_matrix("L", &a, Part::Lower);
    print_matrix("U", &a, Part::Upper);
    print_permutation(&perm);
    print_report(&report);
    println!("|PA - LU|_F = {:.3e}", plu_residual(&a0, &a, &perm));
    Ok(())
}

fn scenario_zero_pivot(config: &SolverConfig) -> anyhow::Result<()> {
    let a0 = array![[0.0, 3.0, -1.0], [4.0, 1.0, 2.0], [-2.0, 7.0, 2.0]];
    let b0 = array![5.0, 6.0, 3.0];

    let mut a = a0.clone();
    match factorize_lu(&mut a, config) {
        Err(e) => println!("unpivoted LU: {}", e),
        Ok(_) => println!("unpivoted LU unexpectedly succeeded"),
    }

    let mut a = a0.clone();
    let mut x = b0.clone();
    let mut perm = vec![0; 3];
    gauss_solve_in_place(&mut a, &mut x, &mut perm, config)?;
    println!("PLU swaps rows and succeeds:");
    print_permutation(&perm);
    print_vector("x", &x);
    println!("residual |Ax - b| = {:.3e}", residual_norm(&a0, &x, &b0));
    Ok(())
}

fn scenario_singular(config: &SolverConfig) {
    let mut a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [0.0, 0.0, 0.0]];
    let mut perm = vec![0; 3];
    match factorize_plu(&mut a, &mut perm, config) {
        Err(e @ GaussError::SingularMatrix { .. }) => println!("PLU rejected matrix: {}", e),
        Err(e) => println!("PLU failed: {}", e),
        Ok(_) => println!("PLU unexpectedly succeeded"),
    }
}

fn run_problem(problem: &ProblemConfig, config: &SolverConfig) -> anyhow::Result<()> {
    let (a0, b0) = problem.to_arrays()?;
    let n = a0.nrows();
    let mut a = a0.clone();
    let mut perm = vec![0; n];

    let report = factorize_plu(&mut a, &mut perm, config)?;
    print_matrix("L", &a, Part::Lower);
    print_matrix("U", &a, Part::Upper);
    print_permutation(&perm);
    print_report(&report);
    println!("|PA - LU|_F = {:.3e}", plu_residual(&a0, &a, &perm));

    if let Some(b0) = b0 {
        let mut x = b0.clone();
        let conditioning = solve(&a, &mut x, Some(&perm[..]), config)?;
        print_vector("x", &x);
        if let Conditioning::IllConditioned { column, pivot, .. } = conditioning {
            println!("WARNING back substitution: tiny diagonal {:.3e} in row {}", pivot, column);
        }
        println!("residual |Ax - b| = {:.3e}", residual_norm(&a0, &x, &b0));
    }
    Ok(())
}

/// Outcome of one benchmark trial.
struct TrialResult {
    lu_roundtrip_dist: f64,
    plu_dist: f64,
    relative_residual: f64,
    seconds: f64,
}

fn run_benchmark(
    n: usize,
    trials: usize,
    seed: Option<u64>,
    config: &SolverConfig,
) -> anyhow::Result<()> {
    let base_seed = seed.unwrap_or_else(|| rand::rng().random());
    println!(
        "Benchmarking order {} with {} trial(s), base seed {}",
        n, trials, base_seed
    );

    // Each trial owns its matrices; nothing is shared between threads.
    let results: Vec<Result<TrialResult, GaussError>> = (0..trials)
        .into_par_iter()
        .map(|t| run_trial(n, base_seed.wrapping_add(t as u64), config))
        .collect();

    let mut worst_lu: f64 = 0.0;
    let mut worst_plu: f64 = 0.0;
    let mut worst_residual: f64 = 0.0;
    for (t, result) in results.into_iter().enumerate() {
        let r = result.with_context(|| format!("trial {}", t))?;
        println!(
            "trial {:>3} | LU round trip {:.3e} | PLU {:.3e} | rel residual {:.3e} | {:.3} s",
            t, r.lu_roundtrip_dist, r.plu_dist, r.relative_residual, r.seconds
        );
        worst_lu = worst_lu.max(r.lu_roundtrip_dist);
        worst_plu = worst_plu.max(r.plu_dist);
        worst_residual = worst_residual.max(r.relative_residual);
    }

    println!(
        "worst: LU round trip {:.3e} | PLU {:.3e} | rel residual {:.3e}",
        worst_lu, worst_plu, worst_residual
    );
    Ok(())
}

fn run_trial(n: usize, seed: u64, config: &SolverConfig) -> Result<TrialResult, GaussError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let a0 = random_diagonally_dominant(n, &mut rng);
    let b0 = Array1::from_shape_fn(n, |_| rng.random_range(-1.0..1.0));
    let start = Instant::now();

    let mut a = a0.clone();
    factorize_lu(&mut a, config)?;
    reconstruct_lu(&mut a);
    let lu_roundtrip_dist = frobenius_norm_dist(&a0, &a);

    let mut a = a0.clone();
    let mut x = b0.clone();
    let mut perm = vec![0; n];
    gauss_solve_in_place(&mut a, &mut x, &mut perm, config)?;
    let plu_dist = plu_residual(&a0, &a, &perm);

    Ok(TrialResult {
        lu_roundtrip_dist,
        plu_dist,
        relative_residual: relative_residual(&a0, &x, &b0),
        seconds: start.elapsed().as_secs_f64(),
    })
}

/// Uniform entries in [-1, 1) with the diagonal shifted by `n`, so unpivoted
/// LU is safe.
fn random_diagonally_dominant(n: usize, rng: &mut StdRng) -> Array2<f64> {
    let mut a = Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0..1.0));
    for i in 0..n {
        a[[i, i]] += n as f64;
    }
    a
}

fn print_matrix(title: &str, a: &Array2<f64>, part: Part) {
    println!("{}:", title);
    let (l, u) = unpack(a);
    let shown = match part {
        Part::Whole => a,
        Part::Lower => &l,
        Part::Upper => &u,
    };
    for row in shown.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{:>10.6}", v)).collect();
        println!("  {}", line.join(" "));
    }
}

fn print_vector(title: &str, x: &Array1<f64>) {
    let line: Vec<String> = x.iter().map(|v| format!("{:.6}", v)).collect();
    println!("{} = [{}]", title, line.join(", "));
}

fn print_permutation(perm: &[usize]) {
    let line: Vec<String> = perm.iter().map(|p| p.to_string()).collect();
    println!("Permutation: [{}]", line.join(", "));
}

fn print_report(report: &FactorReport) {
    match report.conditioning {
        Conditioning::WellConditioned => println!(
            "swaps: {} | min pivot: {:.3e} | well conditioned",
            report.swaps, report.min_pivot
        ),
        Conditioning::IllConditioned {
            column,
            pivot,
            threshold,
        } => println!(
            "swaps: {} | min pivot: {:.3e} | WARNING ill-conditioned at column {} ({:.3e} < {:.3e})",
            report.swaps, report.min_pivot, column, pivot, threshold
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_problem_solver() {
        let cli = Cli::parse_from(["gauss-demo", "--singular-tolerance", "100", "--strict"]);
        let base = SolverConfig {
            ill_conditioned_ratio: 1e-9,
            ..SolverConfig::default()
        };
        let config = cli.solver_config(base).unwrap();
        assert_eq!(config.singular_tolerance, 100.0);
        assert!(config.reject_ill_conditioned);
        assert_eq!(config.ill_conditioned_ratio, 1e-9);
    }

    #[test]
    fn test_absent_flags_keep_problem_solver() {
        let cli = Cli::parse_from(["gauss-demo"]);
        let base = SolverConfig {
            singular_tolerance: 1e-6,
            ..SolverConfig::default()
        };
        assert_eq!(cli.solver_config(base.clone()).unwrap(), base);
    }

    #[test]
    fn test_problem_file_with_large_tolerance_is_singular() {
        let cli = Cli::parse_from(["gauss-demo", "--singular-tolerance", "100"]);
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/reference_3x3.json");
        let problem = ProblemConfig::from_file(&path).unwrap();
        let config = cli.solver_config(problem.solver.clone()).unwrap();

        let (mut a, _) = problem.to_arrays().unwrap();
        let mut perm = vec![0; a.nrows()];
        let err = factorize_plu(&mut a, &mut perm, &config).unwrap_err();
        assert!(err.is_singular());
        assert_eq!(err.column(), Some(0));
    }

    #[test]
    fn test_negative_tolerance_flag_rejected() {
        let cli = Cli::parse_from(["gauss-demo", "--singular-tolerance=-1"]);
        assert!(cli.solver_config(SolverConfig::default()).is_err());
    }
}
