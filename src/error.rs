//! Precondition-violation errors for the handful of call sites where checking
//! is cheap enough to do unconditionally (see spec.md §7 / SPEC_FULL.md §7).

use thiserror::Error;

/// Errors returned by the small set of fallible constructors in this crate.
///
/// Per-pixel hot loops never return `Result`; they trust their preconditions
/// and rely on `debug_assert!` in debug builds instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("grid dimensions must be positive, got {nrows} rows x {ncols} cols")]
    InvalidDims { nrows: isize, ncols: isize },

    #[error("buffer length {got} does not match grid size {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("two rasters passed to the same call have mismatched dimensions: {a_nrows}x{a_ncols} vs {b_nrows}x{b_ncols}")]
    DimensionMismatch {
        a_nrows: isize,
        a_ncols: isize,
        b_nrows: isize,
        b_ncols: isize,
    },

    #[error("scratch buffer '{name}' has capacity {got}, need at least {expected}")]
    ScratchTooSmall {
        name: &'static str,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
