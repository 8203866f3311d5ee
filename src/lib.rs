//! QR decomposition by the modified Gram-Schmidt process, with explicit handling of
//! rank-deficient columns.
//!
//! Given an `m x n` real matrix A with `m >= n`, this crate computes `A = QR` where Q has
//! orthonormal columns and R is upper-triangular. Two variants are available:
//!
//! - **Thin** ([`qr_thin`]): Q is `m x n`, R is `n x n`.
//! - **Full** ([`qr_full`]): Q is `m x m`; its trailing `m - n` columns complete an
//!   orthonormal basis of the whole space, and R is `m x n` with zero trailing rows.
//!
//! ## Algorithm
//!
//! Columns are processed left to right. Each column is normalized, and its component is
//! immediately removed from every column to its right. When a column's residual norm
//! drops to [`RANK_TOLERANCE`] or below (the column is numerically dependent on the ones
//! before it), a unit vector orthogonal to the current frame is manufactured from a
//! standard basis vector instead of dividing by (almost) zero. Q is orthonormal either
//! way; the affected columns are reported by
//! [`QrDecomposition::deficient_columns`].
//!
//! ## Example Usage
//!
//! ```rust
//! use faer::mat;
//! use gram_schmidt_qr::qr_thin;
//!
//! let a = mat![
//!     [1.0, 2.0],
//!     [0.0, 1.0],
//!     [1.0, 0.0f64],
//! ];
//!
//! let qr = qr_thin(a.as_ref()).unwrap();
//!
//! // Q^T Q = I and QR = A, up to rounding.
//! assert!(qr.orthogonality_loss() < 1e-12);
//! assert!(qr.relative_residual(a.as_ref()) < 1e-12);
//! assert!(!qr.is_rank_deficient());
//! ```
//!
//! Callers that manage their own storage can run the factorizer in place on a
//! [`faer::MatMut`] view through [`algorithms::gram_schmidt::gram_schmidt`].

pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod solvers;
pub mod utils;

pub use algorithms::{FactorizationMode, GramSchmidtReport, RANK_TOLERANCE};
pub use error::QrError;
pub use solvers::{QrDecomposition, qr, qr_full, qr_thin};
