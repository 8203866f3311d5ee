//! Demonstration driver for the in-place Gram-Schmidt factorizer.
//!
//! Builds the `m x n` sample matrix with entries `A[i, j] = i - j + 1` on and below the
//! diagonal (zero above), factorizes it in place, prints A, Q and R, and then prints
//! every inner product `q_i . q_j` (j >= i) as numerical evidence that the columns of Q
//! are orthonormal.

use anyhow::Result;
use clap::Parser;
use faer::{Mat, MatRef};
use gram_schmidt_qr::{
    FactorizationMode, algorithms::gram_schmidt::gram_schmidt, matrix::col_slice,
    utils::vector::dot_product,
};

/// Significant digits printed per entry.
const SIGNIFICANT_DIGITS: usize = 6;

/// Width of a printed matrix entry.
const CELL_WIDTH: usize = 9;

/// Command-line arguments for the demonstration driver.
#[derive(Parser, Debug)]
#[clap(
    name = "gram-schmidt",
    about = "Computes and prints the modified Gram-Schmidt QR factorization of a sample matrix."
)]
struct DriverArgs {
    /// Number of rows of A.
    #[clap(long, default_value_t = 5)]
    m: usize,

    /// Number of columns of A.
    #[clap(long, default_value_t = 3)]
    n: usize,

    /// Compute the full factorization (Q is m x m). Implied when m == n.
    #[clap(long)]
    full: bool,
}

/// Drops trailing zeros (and a trailing point) from a fixed-point fraction.
fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Formats `x` in C's `%g` style: [`SIGNIFICANT_DIGITS`] significant digits, trailing
/// zeros removed, and scientific notation with a signed two-digit exponent when the
/// decimal exponent is below -4 or at least the number of significant digits.
fn format_general(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, x);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

/// Formats one matrix entry as a right-aligned cell followed by a separator. With
/// `pad_non_negative`, non-negative entries get an extra leading space so that they
/// line up with negative ones.
fn format_cell(x: f64, pad_non_negative: bool) -> String {
    let pad = if pad_non_negative && x >= 0.0 { " " } else { "" };
    format!("{}{:>width$} ", pad, format_general(x), width = CELL_WIDTH)
}

fn print_matrix(label: &str, mat: MatRef<'_, f64>, pad_non_negative: bool) {
    println!("{} = ", label);
    for i in 0..mat.nrows() {
        let row: String = (0..mat.ncols())
            .map(|j| format_cell(mat[(i, j)], pad_non_negative))
            .collect();
        println!("{}", row);
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let args = DriverArgs::parse();
    let (m, n) = (args.m, args.n);

    if m < n {
        println!("This factorization requires n <= m (got m = {}, n = {}).", m, n);
        return Ok(());
    }

    // Thin and full coincide for square input.
    let mode = if args.full || m == n {
        FactorizationMode::Full
    } else {
        FactorizationMode::Thin
    };
    let q_ncols = mode.q_ncols(m, n);
    let r_nrows = mode.r_nrows(m, n);
    log::info!("Factorizing a {}x{} sample matrix ({:?} mode).", m, n, mode);

    // Only the leading n columns hold input; the rest is room for the completion.
    let mut a = Mat::from_fn(m, q_ncols, |i, j| {
        if j < n && i >= j {
            (i - j + 1) as f64
        } else {
            0.0
        }
    });
    let mut r = Mat::<f64>::zeros(r_nrows, n);

    print_matrix("A", a.as_ref().get(.., 0..n), false);

    let report = gram_schmidt(a.as_mut(), r.as_mut(), mode)?;
    if report.is_rank_deficient() {
        log::warn!(
            "Columns {:?} were numerically dependent; Q holds substituted directions there.",
            report.deficient_columns
        );
    }

    print_matrix("Q", a.as_ref(), true);
    print_matrix("R", r.as_ref(), false);

    println!(
        "Numerical check that {{q_1, ..., q_{}}} is an orthonormal set:",
        q_ncols
    );
    for i in 0..q_ncols {
        for j in i..q_ncols {
            let x = dot_product(col_slice(a.as_ref(), i)?, col_slice(a.as_ref(), j)?);
            println!("q_{} * q_{} = {}", i + 1, j + 1, format_general(x));
        }
    }

    Ok(())
}
