//! Experiment Runner for Orthogonality Analysis.
//!
//! This executable measures how well the modified Gram-Schmidt factorization preserves
//! orthogonality and reproduces its input as the number of columns grows. For every `n`
//! in the sweep it factorizes an `m x n` test matrix and records:
//!
//! - the loss of orthogonality `||I - Q^T Q||_F`,
//! - the relative residual `||A - QR||_F / ||A||_F`,
//! - the number of columns that went through the rank-deficiency fallback.
//!
//! Different scenarios probe different regimes of the algorithm.

use anyhow::{Result, ensure};
use clap::{Parser, ValueEnum};
use faer::prelude::*;
use gram_schmidt_qr::{FactorizationMode, qr};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::path::PathBuf;

/// The kind of test matrix to factorize.
#[derive(ValueEnum, Clone, Debug, Copy)]
enum MatrixScenario {
    /// Entries drawn uniformly from [-1, 1]. Well-conditioned with high probability.
    Random,
    /// Random columns scaled by geometrically decreasing factors, down to 1e-10.
    /// Ill-conditioned, which exposes the orthogonality loss of Gram-Schmidt.
    Graded,
    /// Every odd column is a copy of the preceding even column, so half of the
    /// columns go through the fallback construction.
    RankDeficient,
}

/// Command-line arguments for the orthogonality analysis runner.
#[derive(Parser, Debug)]
#[clap(
    name = "orthogonality-runner",
    about = "Runs an analysis of the orthogonality and accuracy of the Gram-Schmidt QR factorization."
)]
struct OrthoArgs {
    /// The test matrix scenario.
    #[clap(long, value_enum)]
    scenario: MatrixScenario,
    /// Number of rows of the test matrix.
    #[clap(long, default_value_t = 500)]
    m: usize,
    /// Minimum number of columns (n) to test.
    #[clap(long, default_value_t = 10)]
    n_min: usize,
    /// Maximum number of columns (n) to test.
    #[clap(long, default_value_t = 200)]
    n_max: usize,
    /// Step size for iterating n.
    #[clap(long, default_value_t = 10)]
    n_step: usize,
    /// Factorization mode.
    #[clap(long, value_enum, default_value_t = Mode::Thin)]
    mode: Mode,
    /// Path to the output CSV file where results will be written.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
enum Mode {
    Thin,
    Full,
}

impl From<Mode> for FactorizationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Thin => FactorizationMode::Thin,
            Mode::Full => FactorizationMode::Full,
        }
    }
}

/// Represents a single row of data in the output CSV file.
#[derive(Debug, Serialize)]
struct OrthogonalityResult {
    /// Number of rows of A.
    m: usize,
    /// Number of columns of A.
    n: usize,
    /// Orthogonality loss of Q, measured as ||I - Q^T Q||_F.
    ortho_loss: f64,
    /// Relative reconstruction error ||A - QR||_F / ||A||_F.
    relative_residual: f64,
    /// Number of columns that required the rank-deficiency fallback.
    deficient_columns: usize,
}

/// Creates an `m x n` test matrix for the given scenario.
fn create_test_matrix(m: usize, n: usize, scenario: MatrixScenario, rng: &mut StdRng) -> Mat<f64> {
    let mut a = Mat::from_fn(m, n, |_, _| rng.random_range(-1.0..1.0));

    match scenario {
        MatrixScenario::Random => {}
        MatrixScenario::Graded => {
            let decades = 10.0 / (n - 1).max(1) as f64;
            for j in 0..n {
                let scale = 10f64.powf(-decades * j as f64);
                for i in 0..m {
                    a[(i, j)] *= scale;
                }
            }
        }
        MatrixScenario::RankDeficient => {
            for j in (1..n).step_by(2) {
                for i in 0..m {
                    a[(i, j)] = a[(i, j - 1)];
                }
            }
        }
    }

    a
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let args = OrthoArgs::parse();
    ensure!(
        args.n_max <= args.m,
        "n_max ({}) must not exceed m ({}).",
        args.n_max,
        args.m
    );
    log::info!(
        "Starting orthogonality analysis for scenario: {:?}, m = {}, mode: {:?}",
        args.scenario,
        args.m,
        args.mode
    );

    let mut rng = StdRng::seed_from_u64(42); // For reproducible results.
    let mut writer = csv::Writer::from_path(&args.output)?;

    for n in (args.n_min..=args.n_max).step_by(args.n_step.max(1)) {
        if n == 0 {
            continue;
        }
        log::info!("Running for n = {}...", n);

        let a = create_test_matrix(args.m, n, args.scenario, &mut rng);
        let decomposition = qr(a.as_ref(), args.mode.into())?;

        writer.serialize(OrthogonalityResult {
            m: args.m,
            n,
            ortho_loss: decomposition.orthogonality_loss(),
            relative_residual: decomposition.relative_residual(a.as_ref()),
            deficient_columns: decomposition.deficient_columns().len(),
        })?;
    }

    writer.flush()?;
    log::info!(
        "Orthogonality analysis complete. Results saved to {:?}.",
        &args.output
    );
    Ok(())
}
