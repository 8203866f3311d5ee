//! Column access for the factorizer.
//!
//! Gram-Schmidt is a column-oriented algorithm: every step reads one finished column
//! and updates another one. The factorizer works on [`faer`] matrix views and hands
//! their columns to the kernels in [`crate::utils::vector`] as plain slices. The
//! functions in this module perform that conversion; they require a unit row stride,
//! which holds for any owned [`faer::Mat`] and for column sub-views of it.

use crate::error::{QrError, QrErrorKind};
use faer::prelude::IntoConst;
use faer::{MatMut, MatRef};

fn non_contiguous(param_name: &str) -> QrError {
    QrErrorKind::NonContiguousColumns {
        param_name: param_name.to_string(),
    }
    .into()
}

/// Returns column `j` of `mat` as a slice.
///
/// # Panics
///
/// Panics if `j >= mat.ncols()`.
#[inline]
pub fn col_slice(mat: MatRef<'_, f64>, j: usize) -> Result<&[f64], QrError> {
    mat.col(j)
        .try_as_col_major()
        .map(|col| col.as_slice())
        .ok_or_else(|| non_contiguous("a"))
}

/// Returns column `j` of `mat` as a mutable slice.
///
/// # Panics
///
/// Panics if `j >= mat.ncols()`.
#[inline]
pub fn col_slice_mut(mat: MatMut<'_, f64>, j: usize) -> Result<&mut [f64], QrError> {
    mat.col_mut(j)
        .try_as_col_major_mut()
        .map(|col| col.as_slice_mut())
        .ok_or_else(|| non_contiguous("a"))
}

/// Borrows column `src` immutably and column `dst` mutably at the same time.
///
/// This is the access pattern of every Gram-Schmidt update, where a finished column
/// is subtracted from a later one.
///
/// # Panics
///
/// Panics unless `src < dst < mat.ncols()`.
#[inline]
pub fn col_pair_mut(
    mat: MatMut<'_, f64>,
    src: usize,
    dst: usize,
) -> Result<(&[f64], &mut [f64]), QrError> {
    assert!(
        src < dst && dst < mat.ncols(),
        "Invalid column pair ({}, {}) for a matrix with {} columns.",
        src,
        dst,
        mat.ncols(),
    );
    let (head, tail) = mat.split_at_col_mut(dst);
    Ok((col_slice(head.into_const(), src)?, col_slice_mut(tail, 0)?))
}
