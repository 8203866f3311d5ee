//! This module defines the custom error types for the library.
//!
//! Every condition that makes a QR factorization request invalid is collected in a
//! single enum, [`QrErrorKind`], wrapped by the public opaque type [`QrError`].
//!
//! Note that a numerically rank-deficient column is *not* an error: the factorizer
//! handles it locally by manufacturing an orthogonal direction. Errors are reserved for
//! requests that are rejected before the orthogonalization loop starts.
use thiserror::Error;

/// Represents all possible errors that can occur during a QR factorization.
///
#[derive(Error, Debug)]
#[error(transparent)]
pub struct QrError(#[from] QrErrorKind);

/// Private enum containing the distinct kinds of errors.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum QrErrorKind {
    /// The matrix shape cannot be factorized: the implementation requires `1 <= n <= m`.
    #[error(
        "Invalid shape: a {nrows}x{ncols} matrix cannot be factorized, the factorization requires 1 <= n <= m."
    )]
    InvalidShape { nrows: usize, ncols: usize },

    /// A caller-provided buffer does not have the size the factorization mode requires.
    #[error("Dimension mismatch for `{param_name}`: expected {expected}, got {actual}.")]
    DimensionMismatch {
        param_name: String,
        expected: usize,
        actual: usize,
    },

    /// A matrix view does not store its columns as contiguous slices.
    #[error("`{param_name}` must store each column contiguously (unit row stride).")]
    NonContiguousColumns { param_name: String },

    /// The input matrix contains a NaN or an infinity.
    #[error("Non-finite entry in the input matrix at row {row}, column {col}.")]
    NonFiniteEntry { row: usize, col: usize },

    /// No standard basis vector produced a usable orthogonal direction.
    #[error(
        "Could not construct an orthogonal direction for column {column}: every candidate collapsed below the rank tolerance."
    )]
    ComplementExhausted { column: usize },
}

// Compare the inner `QrErrorKind`.
impl PartialEq for QrError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
