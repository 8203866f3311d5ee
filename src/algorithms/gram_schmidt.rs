//! In-place modified Gram-Schmidt QR factorization.
//!
//! ** NOTE: We recommend using the high-level functions [`crate::solvers::qr_thin`] and
//! [`crate::solvers::qr_full`] instead. This module is intended for callers that own
//! their Q/R storage and want the factorization computed in place.
//!
//! The main function [`gram_schmidt`] overwrites the columns of `A` with the orthonormal
//! columns of `Q` as soon as each one is finished, and writes the upper triangle of `R`
//! column by column. After column `i` is normalized its component is removed from every
//! later column right away (the "modified" variant), instead of projecting each column
//! against the original vectors all at once.
//!
//! ## Rank deficiency
//!
//! When the residual of a column has norm at or below [`RANK_TOLERANCE`] the column is
//! numerically dependent on the ones before it. Instead of dividing by (almost) zero,
//! the factorizer manufactures a unit vector orthogonal to the current frame:
//!
//! - for column 0, the first standard basis vector `e_0`;
//! - for column `i > 0`, `e_i` minus its projections onto `q_0, ..., q_{i-1}`,
//!   renormalized (see [`orthogonal_complement_direction`]).
//!
//! The same construction generates the trailing `m - n` columns of a full factorization.
//! Q stays orthonormal either way, but for a deficient column `q_i` is no longer tied to
//! `a_i`; the affected indices are listed in the returned [`GramSchmidtReport`].
//!
//! Cost: O(m n^2) flops for the thin factorization, O(1) extra memory.

use super::{FactorizationMode, GramSchmidtReport, QrError, RANK_TOLERANCE};
use crate::{
    error::QrErrorKind,
    matrix::{col_pair_mut, col_slice, col_slice_mut},
    utils::vector::{dot_product, norm, scalar_div_in_place, scalar_sub},
};
use faer::{
    MatMut, MatRef,
    prelude::{Reborrow, ReborrowMut},
};

/// Computes the QR factorization of the leading `n` columns of `a` in place.
///
/// `m = a.nrows()` and `n = r.ncols()`. On entry the first `n` columns of `a` hold the
/// matrix to factorize. On exit they hold the orthonormal columns of Q and, in
/// [`FactorizationMode::Full`], columns `n..m` of `a` hold the orthonormal completion.
/// Entry `(i, j)` of `r` with `i <= j` holds `R[i, j]`; entries below the diagonal and
/// rows `n..m` of a full `r` are never written.
///
/// # Arguments
/// * `a`: `m x n` (thin) or `m x m` (full) view of A, overwritten by Q. Its columns must
///   be contiguous (unit row stride), as they are for any owned [`faer::Mat`].
/// * `r`: `n x n` (thin) or `m x n` (full) view receiving R.
/// * `mode`: Thin or full factorization.
///
/// # Returns
/// A [`GramSchmidtReport`] listing the columns that required the rank-deficiency
/// fallback, or a [`QrError`] if the views do not satisfy `1 <= n <= m` and the shape
/// requirements of `mode`, or if the input contains a non-finite value. Validation
/// happens before anything is written.
pub fn gram_schmidt(
    mut a: MatMut<'_, f64>,
    mut r: MatMut<'_, f64>,
    mode: FactorizationMode,
) -> Result<GramSchmidtReport, QrError> {
    validate_shapes(a.rb(), r.rb(), mode)?;

    let m = a.nrows();
    let n = r.ncols();
    let mut report = GramSchmidtReport::default();

    for i in 0..n {
        let r_ii = norm(col_slice(a.rb(), i)?);
        r[(i, i)] = r_ii;

        if r_ii > RANK_TOLERANCE {
            scalar_div_in_place(col_slice_mut(a.rb_mut(), i)?, r_ii);
        } else {
            log::debug!(
                "Column {} has residual norm {:e} <= {:e}; substituting an orthogonal direction.",
                i,
                r_ii,
                RANK_TOLERANCE
            );
            report.deficient_columns.push(i);

            if i == 0 {
                let q_0 = col_slice_mut(a.rb_mut(), 0)?;
                q_0.fill(0.0);
                q_0[0] = 1.0;
            } else {
                orthogonal_complement_direction(a.rb_mut(), i)?;
            }
        }

        // Deflate the remaining input columns against the finished q_i.
        for j in i + 1..n {
            let (q_i, a_j) = col_pair_mut(a.rb_mut(), i, j)?;
            let r_ij = dot_product(q_i, a_j);
            scalar_sub(q_i, r_ij, a_j);
            r[(i, j)] = r_ij;
        }
    }

    if mode == FactorizationMode::Full {
        for i in n..m {
            orthogonal_complement_direction(a.rb_mut(), i)?;
        }
    }

    Ok(report)
}

/// Overwrites column `i` of `q` with a unit vector orthogonal to columns `0..i`.
///
/// Columns `0..i` must already be orthonormal and `i` must be at least 1. The candidate
/// is built from the standard basis vector `e_i` as
///
/// `w = e_i - q_0[i] q_0 - q_1[i] q_1 - ... - q_{i-1}[i] q_{i-1}`,
///
/// subtracting the `q_0` term first and the others in increasing order, and `w / ||w||`
/// is stored. If `e_i` lies in the span of the frame, `||w||` collapses; the candidates
/// `e_{i+1}, ..., e_{m-1}, e_0, ..., e_{i-1}` are then tried in that order and the first
/// one with `||w|| > RANK_TOLERANCE` is used.
///
/// # Panics
///
/// Panics if `i == 0` or `i >= q.ncols()`.
pub fn orthogonal_complement_direction(mut q: MatMut<'_, f64>, i: usize) -> Result<(), QrError> {
    let m = q.nrows();

    for k in (i..m).chain(0..i) {
        project_out_basis_vector(q.rb_mut(), i, k)?;

        let w_norm = norm(col_slice(q.rb(), i)?);
        if w_norm > RANK_TOLERANCE {
            if k != i {
                log::warn!(
                    "e_{} lies in the span of q_0..q_{}; column {} was built from e_{} instead.",
                    i,
                    i - 1,
                    i,
                    k
                );
            }
            scalar_div_in_place(col_slice_mut(q.rb_mut(), i)?, w_norm);
            return Ok(());
        }
    }

    Err(QrErrorKind::ComplementExhausted { column: i }.into())
}

/// Stores `e_k` minus its projections onto columns `0..i` into column `i`.
fn project_out_basis_vector(mut q: MatMut<'_, f64>, i: usize, k: usize) -> Result<(), QrError> {
    let (q_0, w) = col_pair_mut(q.rb_mut(), 0, i)?;
    w.fill(0.0);
    scalar_sub(q_0, q_0[k], w);
    w[k] += 1.0;

    for j in 1..i {
        let (q_j, w) = col_pair_mut(q.rb_mut(), j, i)?;
        scalar_sub(q_j, q_j[k], w);
    }
    Ok(())
}

fn validate_shapes(
    a: MatRef<'_, f64>,
    r: MatRef<'_, f64>,
    mode: FactorizationMode,
) -> Result<(), QrError> {
    let m = a.nrows();
    let n = r.ncols();

    if n == 0 || m < n {
        return Err(QrErrorKind::InvalidShape { nrows: m, ncols: n }.into());
    }

    let expected_q_ncols = mode.q_ncols(m, n);
    if a.ncols() != expected_q_ncols {
        return Err(QrErrorKind::DimensionMismatch {
            param_name: "a.ncols".to_string(),
            expected: expected_q_ncols,
            actual: a.ncols(),
        }
        .into());
    }

    let expected_r_nrows = mode.r_nrows(m, n);
    if r.nrows() != expected_r_nrows {
        return Err(QrErrorKind::DimensionMismatch {
            param_name: "r.nrows".to_string(),
            expected: expected_r_nrows,
            actual: r.nrows(),
        }
        .into());
    }

    if a.row_stride() != 1 {
        return Err(QrErrorKind::NonContiguousColumns {
            param_name: "a".to_string(),
        }
        .into());
    }

    for col in 0..n {
        for row in 0..m {
            if !a[(row, col)].is_finite() {
                return Err(QrErrorKind::NonFiniteEntry { row, col }.into());
            }
        }
    }

    Ok(())
}
