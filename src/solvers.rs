//! This module provides a high-level, user-friendly API for computing the QR
//! factorization of a dense [`faer`] matrix.
//!
//! The functions here allocate the Q and R storage, run the in-place factorizer from
//! [`crate::algorithms::gram_schmidt`], and hand back an owned [`QrDecomposition`].

use crate::{
    algorithms::{FactorizationMode, GramSchmidtReport, gram_schmidt::gram_schmidt},
    error::{QrError, QrErrorKind},
};
use faer::prelude::*;

/// The result of a QR factorization `A = QR`.
#[derive(Clone, Debug)]
pub struct QrDecomposition {
    q: Mat<f64>,
    r: Mat<f64>,
    mode: FactorizationMode,
    report: GramSchmidtReport,
}

impl QrDecomposition {
    /// The orthonormal factor: `m x n` (thin) or `m x m` (full).
    pub fn q(&self) -> MatRef<'_, f64> {
        self.q.as_ref()
    }

    /// The upper-triangular factor: `n x n` (thin) or `m x n` (full, trailing rows zero).
    /// Entries below the diagonal are zero.
    pub fn r(&self) -> MatRef<'_, f64> {
        self.r.as_ref()
    }

    /// The leading `n` columns of Q, which span the column space of A when A has full rank.
    pub fn thin_q(&self) -> MatRef<'_, f64> {
        self.q.as_ref().get(.., 0..self.r.ncols())
    }

    pub fn mode(&self) -> FactorizationMode {
        self.mode
    }

    /// Columns for which Q contains a manufactured direction instead of the normalized
    /// residual of the input column.
    pub fn deficient_columns(&self) -> &[usize] {
        &self.report.deficient_columns
    }

    pub fn is_rank_deficient(&self) -> bool {
        self.report.is_rank_deficient()
    }

    /// Multiplies the factors back together: `Q[:, :n] * R[:n, :]`.
    pub fn reconstruct(&self) -> Mat<f64> {
        let n = self.r.ncols();
        self.thin_q() * self.r.as_ref().get(0..n, ..)
    }

    /// Frobenius norm of `I - Q^T Q` over all columns of Q.
    pub fn orthogonality_loss(&self) -> f64 {
        let k = self.q.ncols();
        let identity = Mat::<f64>::identity(k, k);
        (&identity - self.q.as_ref().adjoint() * self.q.as_ref()).norm_l2()
    }

    /// `||A - QR||_F / ||A||_F`, or the absolute residual when `A` is zero.
    pub fn relative_residual(&self, a: MatRef<'_, f64>) -> f64 {
        let reconstructed = self.reconstruct();
        let residual = (a - reconstructed.as_ref()).norm_l2();
        let a_norm = a.norm_l2();
        if a_norm > 0.0 {
            residual / a_norm
        } else {
            residual
        }
    }
}

/// Computes the QR factorization of `a` by modified Gram-Schmidt.
///
/// When `a` is square the thin and full factorizations coincide and the result is
/// reported as [`FactorizationMode::Full`].
///
/// # Arguments
/// * `a`: An `m x n` matrix with `1 <= n <= m` and finite entries.
/// * `mode`: Thin (`Q` is `m x n`) or full (`Q` is `m x m`).
///
/// # Returns
/// A `Result` containing the [`QrDecomposition`], or a [`QrError`] if `a` has an
/// unsupported shape or contains a non-finite entry.
pub fn qr(a: MatRef<'_, f64>, mode: FactorizationMode) -> Result<QrDecomposition, QrError> {
    let (m, n) = (a.nrows(), a.ncols());
    let mode = if m == n {
        FactorizationMode::Full
    } else {
        mode
    };

    if n == 0 || m < n {
        return Err(QrErrorKind::InvalidShape { nrows: m, ncols: n }.into());
    }

    // Q starts as a copy of A followed by zeroed room for the completion, if any,
    // and is orthonormalized in place.
    let mut q = Mat::<f64>::zeros(m, mode.q_ncols(m, n));
    q.as_mut().get_mut(.., 0..n).copy_from(a);
    let mut r = Mat::<f64>::zeros(mode.r_nrows(m, n), n);

    let report = gram_schmidt(q.as_mut(), r.as_mut(), mode)?;

    if report.is_rank_deficient() {
        log::debug!(
            "QR of a {}x{} matrix used the rank-deficiency fallback for columns {:?}.",
            m,
            n,
            report.deficient_columns
        );
    }

    Ok(QrDecomposition {
        q,
        r,
        mode,
        report,
    })
}

/// Computes the thin QR factorization: `Q` is `m x n`, `R` is `n x n`.
pub fn qr_thin(a: MatRef<'_, f64>) -> Result<QrDecomposition, QrError> {
    qr(a, FactorizationMode::Thin)
}

/// Computes the full QR factorization: `Q` is `m x m`, `R` is `m x n`.
pub fn qr_full(a: MatRef<'_, f64>) -> Result<QrDecomposition, QrError> {
    qr(a, FactorizationMode::Full)
}
