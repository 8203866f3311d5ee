//! Dense vector kernels used by the Gram-Schmidt factorizer.
//!
//! Every kernel operates on `f64` slices in O(len) time and O(1) extra space. The
//! slice length plays the role of an explicit length argument, so the kernels cannot
//! read past the end of their operands: out-of-range offsets panic through ordinary
//! slice indexing.
//!
//! The `partial*`/`sub*` variants restrict an operation to a contiguous window of one
//! operand, selected by a start index. The factorizer itself only needs the full-length
//! kernels; the windowed ones exist for block-based callers.

/// Returns the Euclidean norm `sqrt(sum x_i^2)`.
///
/// The sum of squares is accumulated relative to the largest magnitude seen so far, so
/// the result is finite for every finite input, including entries whose squares would
/// overflow (`|x_i| > 1e154`) or underflow (`|x_i| < 1e-154`).
#[inline]
pub fn norm(x: &[f64]) -> f64 {
    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for &v in x {
        if v != 0.0 {
            let abs = v.abs();
            if scale < abs {
                let ratio = scale / abs;
                ssq = 1.0 + ssq * ratio * ratio;
                scale = abs;
            } else {
                let ratio = abs / scale;
                ssq += ratio * ratio;
            }
        }
    }
    scale * ssq.sqrt()
}

/// Returns the dot product `sum x_i * y_i` of two vectors of equal length.
#[inline]
pub fn dot_product(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "dot_product operands differ in length");
    x.iter().zip(y).map(|(&a, &b)| a * b).sum()
}

/// Stores `x / r` into `out`.
#[inline]
pub fn scalar_div(x: &[f64], r: f64, out: &mut [f64]) {
    debug_assert_eq!(x.len(), out.len(), "scalar_div operands differ in length");
    for (o, &v) in out.iter_mut().zip(x) {
        *o = v / r;
    }
}

/// Divides `x` by `r` in place. This is [`scalar_div`] with `out` aliasing `x`.
#[inline]
pub fn scalar_div_in_place(x: &mut [f64], r: f64) {
    for v in x.iter_mut() {
        *v /= r;
    }
}

/// Accumulate-subtract: `y -= r * x`.
#[inline]
pub fn scalar_sub(x: &[f64], r: f64, y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len(), "scalar_sub operands differ in length");
    for (o, &v) in y.iter_mut().zip(x) {
        *o -= r * v;
    }
}

/// Copies `x` into `y`.
#[inline]
pub fn vec_copy(x: &[f64], y: &mut [f64]) {
    y.copy_from_slice(x);
}

/// Copies the window `x[index..index + y.len()]` into `y`.
///
/// # Panics
///
/// Panics if `index + y.len() > x.len()`.
#[inline]
pub fn partialvec_copy(x: &[f64], y: &mut [f64], index: usize) {
    let len = y.len();
    y.copy_from_slice(&x[index..index + len]);
}

/// Accumulate-subtract into a window of `y`: `y[index + i] -= r * x[i]` for every `i < x.len()`.
///
/// # Panics
///
/// Panics if `index + x.len() > y.len()`.
#[inline]
pub fn partialscalar_sub(x: &[f64], r: f64, index: usize, y: &mut [f64]) {
    scalar_sub(x, r, &mut y[index..index + x.len()]);
}

/// Returns the dot product of the tails `x[index..]` and `y[index..]`.
#[inline]
pub fn partialdot_product(x: &[f64], y: &[f64], index: usize) -> f64 {
    dot_product(&x[index..], &y[index..])
}

/// Returns the dot product of the window `x[index..index + y.len()]` with `y`.
///
/// # Panics
///
/// Panics if `index + y.len() > x.len()`.
#[inline]
pub fn subdot_product(x: &[f64], y: &[f64], index: usize) -> f64 {
    dot_product(&x[index..index + y.len()], y)
}
