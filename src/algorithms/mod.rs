//! Core factorization algorithms.
//!
//! ** NOTE: We recommend using the high-level functions in [`crate::solvers`] instead.
//! The in-place routine in [`gram_schmidt`] is intended for callers that manage their
//! own storage.

pub mod gram_schmidt;

pub use crate::error::QrError;

/// Column norms at or below this value are treated as numerically zero.
///
/// The literal is `10e-7`, i.e. `1e-6`. It is an absolute threshold, not scaled by the
/// magnitude of the input.
pub const RANK_TOLERANCE: f64 = 10e-7;

/// Selects between the reduced and the complete factorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactorizationMode {
    /// Q is `m x n` and R is `n x n`.
    Thin,
    /// Q is `m x m` and R is `m x n`. The trailing `m - n` columns of Q complete an
    /// orthonormal basis of the whole space; the trailing rows of R are zero.
    Full,
}

impl FactorizationMode {
    /// Number of columns of Q for an `m x n` input.
    #[inline]
    pub fn q_ncols(self, m: usize, n: usize) -> usize {
        match self {
            FactorizationMode::Thin => n,
            FactorizationMode::Full => m,
        }
    }

    /// Number of rows of R for an `m x n` input.
    #[inline]
    pub fn r_nrows(self, m: usize, n: usize) -> usize {
        self.q_ncols(m, n)
    }
}

/// Summary of a Gram-Schmidt run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GramSchmidtReport {
    /// Indices `i < n` whose residual norm fell at or below [`RANK_TOLERANCE`], so that
    /// `q_i` was manufactured instead of being the normalized residual of `a_i`.
    ///
    /// For these columns `r[(i, i)]` holds the small residual norm, and the
    /// correspondence between the span of the leading columns of Q and A is lost.
    pub deficient_columns: Vec<usize>,
}

impl GramSchmidtReport {
    /// Returns `true` if any column required the fallback construction.
    #[inline]
    pub fn is_rank_deficient(&self) -> bool {
        !self.deficient_columns.is_empty()
    }
}
