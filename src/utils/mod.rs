//! Low-level numeric utilities.
//!
//! - **`vector`**: the dense vector kernels (norm, dot product, scaled division and
//!   subtraction, plus windowed variants) the Gram-Schmidt factorizer is built from.
//!   They work on plain `f64` slices; [`crate::matrix`] hands them the columns of a
//!   [`faer`] matrix view.

pub mod vector;
