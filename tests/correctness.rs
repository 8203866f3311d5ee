//! Integration test suite to verify the mathematical correctness of the Gram-Schmidt
//! QR factorization.
//!
//! # Test Methodology
//!
//! A QR factorization is characterized by two properties that can be checked without
//! knowing the exact factors:
//! 1.  **Orthonormality:** `Q^T Q = I`, measured as `||I - Q^T Q||_F`.
//! 2.  **Reconstruction:** `Q[:, :n] R = A`, measured as `||A - QR||_F / ||A||_F`.
//!
//! Both are checked on seeded random matrices of several shapes, in thin and full mode.
//! On top of that, a set of small hand-computed scenarios pins down the exact output of
//! the rank-deficiency fallback, whose result is a policy choice rather than something
//! implied by `A = QR`.

use anyhow::{Result, ensure};
use faer::{mat, prelude::*};
use gram_schmidt_qr::{
    FactorizationMode, RANK_TOLERANCE, algorithms::gram_schmidt::gram_schmidt, qr, qr_full,
    qr_thin,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Tolerance for orthogonality and reconstruction on well-conditioned random input.
const FACTOR_TOLERANCE: f64 = 1e-10;

/// Tolerance for entries that are known in closed form.
const EXACT_TOLERANCE: f64 = 1e-12;

/// Creates a reproducible `m x n` matrix with entries uniform in [-1, 1].
fn random_matrix(m: usize, n: usize, seed: u64) -> Mat<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Mat::from_fn(m, n, |_, _| rng.random_range(-1.0..1.0))
}

/// Returns the largest absolute entry of `R` strictly below the diagonal.
fn max_below_diagonal(r: MatRef<'_, f64>) -> f64 {
    let mut max = 0.0f64;
    for j in 0..r.ncols() {
        for i in j + 1..r.nrows() {
            max = max.max(r[(i, j)].abs());
        }
    }
    max
}

fn ensure_close(actual: MatRef<'_, f64>, expected: MatRef<'_, f64>, what: &str) -> Result<()> {
    let err = (actual - expected).norm_l2();
    ensure!(err < EXACT_TOLERANCE, "{} deviates by {}", what, err);
    Ok(())
}

/// A macro to generate the boilerplate for each random-matrix test.
///
/// Each generated test:
/// 1. Builds a seeded random `m x n` matrix.
/// 2. Factorizes it in the given mode.
/// 3. Checks the shapes of Q and R, orthonormality, reconstruction, and that R is
///    upper-triangular.
macro_rules! generate_factorization_test {
    ($test_name:ident, $m:expr, $n:expr, $mode:expr) => {
        #[test]
        fn $test_name() -> Result<()> {
            let (m, n) = ($m, $n);
            let a = random_matrix(m, n, 42);

            let decomposition = qr(a.as_ref(), $mode)?;
            let q_ncols = decomposition.mode().q_ncols(m, n);

            ensure!(decomposition.q().nrows() == m && decomposition.q().ncols() == q_ncols);
            ensure!(decomposition.r().nrows() == q_ncols && decomposition.r().ncols() == n);
            ensure!(
                !decomposition.is_rank_deficient(),
                "random input should have full rank"
            );

            let ortho_loss = decomposition.orthogonality_loss();
            ensure!(
                ortho_loss < FACTOR_TOLERANCE,
                "orthogonality loss too high: {}",
                ortho_loss
            );

            let residual = decomposition.relative_residual(a.as_ref());
            ensure!(
                residual < FACTOR_TOLERANCE,
                "reconstruction error too high: {}",
                residual
            );

            ensure!(max_below_diagonal(decomposition.r()) == 0.0);
            Ok(())
        }
    };
}

// --- Random-matrix suite ---

generate_factorization_test!(test_thin_tall, 40, 10, FactorizationMode::Thin);
generate_factorization_test!(test_full_tall, 40, 10, FactorizationMode::Full);
generate_factorization_test!(test_thin_square, 25, 25, FactorizationMode::Thin);
generate_factorization_test!(test_full_square, 25, 25, FactorizationMode::Full);
generate_factorization_test!(test_thin_single_column, 7, 1, FactorizationMode::Thin);
generate_factorization_test!(test_full_single_column, 7, 1, FactorizationMode::Full);
generate_factorization_test!(test_full_one_by_one, 1, 1, FactorizationMode::Full);
generate_factorization_test!(test_full_nearly_square, 13, 12, FactorizationMode::Full);

// --- Hand-computed scenarios ---

#[test]
fn test_zero_first_column_maps_to_e0() -> Result<()> {
    let a = Mat::<f64>::zeros(3, 1);
    let decomposition = qr_thin(a.as_ref())?;

    ensure_close(
        decomposition.q(),
        mat![[1.0], [0.0], [0.0f64]].as_ref(),
        "q_0",
    )?;
    ensure!(decomposition.deficient_columns() == [0]);
    Ok(())
}

#[test]
fn test_square_two_by_two() -> Result<()> {
    // Columns (1, 0) and (1, 1).
    let a = mat![[1.0, 1.0], [0.0, 1.0f64]];
    let decomposition = qr_thin(a.as_ref())?;

    ensure_close(
        decomposition.q(),
        Mat::<f64>::identity(2, 2).as_ref(),
        "Q",
    )?;
    ensure_close(
        decomposition.r(),
        mat![[1.0, 1.0], [0.0, 1.0f64]].as_ref(),
        "R",
    )?;
    Ok(())
}

#[test]
fn test_identical_columns() -> Result<()> {
    let a = mat![[1.0, 1.0], [0.0, 0.0], [0.0, 0.0f64]];
    let decomposition = qr_thin(a.as_ref())?;
    let r = decomposition.r();

    ensure!(decomposition.deficient_columns() == [1]);
    ensure!((r[(0, 0)] - 1.0).abs() < EXACT_TOLERANCE);
    ensure!((r[(0, 1)] - 1.0).abs() < EXACT_TOLERANCE);
    ensure!(r[(1, 1)] <= RANK_TOLERANCE);
    ensure_close(
        decomposition.q(),
        mat![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0f64]].as_ref(),
        "Q",
    )?;
    Ok(())
}

#[test]
fn test_full_from_single_column() -> Result<()> {
    let a = mat![[2.0], [0.0], [0.0f64]];
    let decomposition = qr_full(a.as_ref())?;

    ensure!(decomposition.q().ncols() == 3);
    ensure!(decomposition.orthogonality_loss() < EXACT_TOLERANCE);
    // Column 0 is the normalized input; the completion is e_1, e_2.
    ensure_close(
        decomposition.q(),
        Mat::<f64>::identity(3, 3).as_ref(),
        "Q",
    )?;
    ensure!((decomposition.r()[(0, 0)] - 2.0).abs() < EXACT_TOLERANCE);
    ensure!(decomposition.r()[(1, 0)] == 0.0 && decomposition.r()[(2, 0)] == 0.0);
    Ok(())
}

#[test]
fn test_full_completion_spans_space_when_e_i_is_in_span() -> Result<()> {
    // q_0 = e_1, so the completion cannot be built from e_1 itself.
    let a = mat![[0.0], [3.0], [0.0f64]];
    let decomposition = qr_full(a.as_ref())?;

    ensure!(decomposition.orthogonality_loss() < EXACT_TOLERANCE);
    ensure!(decomposition.q()[(1, 0)] == 1.0);
    Ok(())
}

#[test]
fn test_refactorizing_orthonormal_q_is_idempotent() -> Result<()> {
    let a = random_matrix(8, 8, 7);
    let first = qr_full(a.as_ref())?;
    let second = qr_full(first.q())?;

    let q_err = (second.q() - first.q()).norm_l2();
    ensure!(q_err < FACTOR_TOLERANCE, "Q changed by {}", q_err);
    // R of an orthonormal matrix is the identity (up to rounding).
    let r_err = (second.r() - Mat::<f64>::identity(8, 8).as_ref()).norm_l2();
    ensure!(r_err < FACTOR_TOLERANCE, "R deviates from I by {}", r_err);
    Ok(())
}

#[test]
fn test_rank_deficient_matrix_keeps_orthonormal_q() -> Result<()> {
    // Column 2 is the sum of columns 0 and 1.
    let base = random_matrix(10, 2, 3);
    let base = base.as_ref();
    let a = Mat::from_fn(10, 3, |i, j| match j {
        2 => base[(i, 0)] + base[(i, 1)],
        _ => base[(i, j)],
    });
    let decomposition = qr_thin(a.as_ref())?;

    ensure!(decomposition.deficient_columns() == [2]);
    ensure!(decomposition.orthogonality_loss() < FACTOR_TOLERANCE);
    ensure!(decomposition.relative_residual(a.as_ref()) < 1e-10);
    Ok(())
}

#[test]
fn test_in_place_api_matches_high_level_api() -> Result<()> {
    let a = random_matrix(6, 3, 11);

    let mut q = a.clone();
    let mut r = Mat::<f64>::zeros(3, 3);
    let report = gram_schmidt(q.as_mut(), r.as_mut(), FactorizationMode::Thin)?;
    ensure!(!report.is_rank_deficient());

    let decomposition = qr_thin(a.as_ref())?;
    ensure_close(q.as_ref(), decomposition.q(), "Q")?;
    ensure_close(r.as_ref(), decomposition.r(), "R")?;
    Ok(())
}

#[test]
fn test_large_entries_keep_q_orthonormal() -> Result<()> {
    // Squaring these entries overflows; the column norm must not.
    let a = mat![[1e200, 0.0], [1e200, 1.0], [0.0, 0.0f64]];
    let decomposition = qr_thin(a.as_ref())?;

    ensure!(!decomposition.is_rank_deficient());
    let ortho_loss = decomposition.orthogonality_loss();
    ensure!(ortho_loss < 1e-10, "orthogonality loss too high: {}", ortho_loss);
    let r_00 = decomposition.r()[(0, 0)];
    ensure!(
        (r_00 / (std::f64::consts::SQRT_2 * 1e200) - 1.0).abs() < EXACT_TOLERANCE,
        "r_00 = {}",
        r_00
    );
    Ok(())
}

#[test]
fn test_thin_fallback_skips_basis_vector_in_span() -> Result<()> {
    // q_0 = e_1 and column 1 is parallel to it, so column 1 is built from e_2.
    let a = mat![[0.0, 0.0], [1.0, 2.0], [0.0, 0.0f64]];
    let decomposition = qr_thin(a.as_ref())?;

    ensure!(decomposition.deficient_columns() == [1]);
    ensure_close(
        decomposition.q(),
        mat![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0f64]].as_ref(),
        "Q",
    )?;
    ensure!((decomposition.r()[(0, 1)] - 2.0).abs() < EXACT_TOLERANCE);
    ensure!(decomposition.relative_residual(a.as_ref()) < EXACT_TOLERANCE);
    Ok(())
}

#[test]
fn test_invalid_inputs_are_rejected() -> Result<()> {
    let wide = Mat::<f64>::zeros(2, 3);
    let err = qr_thin(wide.as_ref()).unwrap_err();
    ensure!(err.to_string().starts_with("Invalid shape"));

    let empty = Mat::<f64>::zeros(3, 0);
    ensure!(qr_full(empty.as_ref()).is_err());

    let nan = mat![[1.0], [f64::NAN]];
    let err = qr_thin(nan.as_ref()).unwrap_err();
    ensure!(
        err.to_string() == "Non-finite entry in the input matrix at row 1, column 0.",
        "unexpected message: {}",
        err
    );
    Ok(())
}
