//! Dense row-major 2-D matrices.
//!
//! This crate provides a single generic [`Matrix<T>`] type: a dense grid stored as one
//! contiguous row-major buffer, with geometric transforms, skippable row/column traversal and
//! element-wise kernels that switch between sequential and rayon-parallel execution.
//!
//! # Core Types
//!
//! - [`Matrix`]: Owned dense grid; every row is a contiguous slice of the backing buffer
//! - [`Point`]: `(row, col)` coordinate used for neighbour and diagonal addressing
//! - [`SkipIterator`]: Iterators that report their remaining length and skip in O(1)
//!
//! # Operations
//!
//! ## Addressing
//!
//! - [`Matrix::get`], [`Matrix::set`], [`Matrix::up_of`] and friends, [`Matrix::adjacent8_points`]
//! - Diagonals: [`Matrix::get_lu2rd`], [`Matrix::set_ru2ld`], [`Matrix::update_lu2rd`]
//!
//! ## Transforms
//!
//! - [`Matrix::copy_range`], [`Matrix::extend_with`], [`Matrix::extend_sides_with`]
//! - [`Matrix::rotate90`], [`Matrix::transpose`], [`Matrix::flip_h`], [`Matrix::reshape`]
//! - [`Matrix::repelem`], [`Matrix::repmat`], [`Matrix::vstack`], [`Matrix::hstack`]
//!
//! ## Element-wise algebra
//!
//! - [`Matrix::map`], [`Matrix::map_to`], [`Matrix::update_all`], [`Matrix::replace_if`]
//! - [`Matrix::zip_with`], [`Matrix::add`], [`Matrix::subtract`], [`Matrix::multiply`]
//! - [`zip_all`], [`zip_all_with`]: n-ary zips over same-shaped matrices
//!
//! ## Traversal
//!
//! - [`Matrix::stream_h`] (row-major), [`Matrix::stream_v`] (column-major)
//! - [`Matrix::stream_r`] / [`Matrix::stream_c`]: one sub-iterator per row / column
//! - [`Matrix::stream_lu2rd`] / [`Matrix::stream_ru2ld`]: diagonals
//!
//! # Example
//!
//! ```rust
//! use dense_grid::Matrix;
//!
//! let a = Matrix::from([[1, 2], [3, 4]]);
//! let b = Matrix::from([[10, 20], [30, 40]]);
//!
//! assert_eq!(a.transpose(), Matrix::from([[1, 3], [2, 4]]));
//! assert_eq!(a.add(&b).unwrap(), Matrix::from([[11, 22], [33, 44]]));
//! assert_eq!(a.multiply(&b).unwrap(), Matrix::from([[70, 100], [150, 220]]));
//! ```
//!
//! # Parallel execution
//!
//! With the `parallel` feature (on by default), element-wise operations over more than
//! [`MIN_COUNT_FOR_PARALLEL`] cells run on the rayon pool. The choice can be forced per
//! thread with [`set_parallel_mode`] or [`with_parallel_mode`]; results never depend on it.

mod access;
mod algebra;
pub mod dispatch;
mod element;
mod point;
mod storage;
pub mod stream;
mod transform;

// ============================================================================
// Storage
// ============================================================================
pub use storage::Matrix;

// ============================================================================
// Element bounds
// ============================================================================
pub use element::{Element, MaybeSend, MaybeSendSync, MaybeSync, Scalar};

// ============================================================================
// Addressing
// ============================================================================
pub use point::Point;

// ============================================================================
// Element-wise algebra
// ============================================================================
pub use algebra::{is_same_shape_all, zip_all, zip_all_with};

// ============================================================================
// Execution dispatch
// ============================================================================
pub use dispatch::{
    parallel_mode, set_parallel_mode, should_parallelize, with_parallel_mode, ParallelMode,
    MIN_COUNT_FOR_PARALLEL,
};

// ============================================================================
// Streaming
// ============================================================================
pub use stream::{ColumnMajor, Columns, Diagonal, RowMajor, Rows, SkipIterator};

// ============================================================================
// Error types
// ============================================================================

/// Broad classification of a [`MatrixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The caller passed arguments the operation cannot accept.
    Argument,
    /// The matrix is in a state the operation does not support (e.g. not square).
    State,
    /// An index, range or cursor lies outside the valid bounds.
    Bounds,
}

/// Errors that can occur during matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Operands of an element-wise or stacking operation have incompatible shapes.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// `lhs.cols != rhs.rows` in a matrix product.
    #[error("inner dimension mismatch: lhs has {lhs_cols} columns, rhs has {rhs_rows} rows")]
    InnerDimensionMismatch { lhs_cols: usize, rhs_rows: usize },

    /// A row differs in length from the first row.
    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A flat buffer does not hold exactly `rows * cols` elements.
    #[error("buffer of length {len} cannot back a {rows}x{cols} matrix")]
    DataLengthMismatch { len: usize, rows: usize, cols: usize },

    /// A row or column argument has the wrong length.
    #[error("expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A diagonal argument is shorter than the matrix side.
    #[error("diagonal of length {actual} is shorter than the required {required}")]
    DiagonalTooShort { required: usize, actual: usize },

    /// Main and anti-diagonal arguments have different lengths.
    #[error("diagonal lengths differ: {0} vs {1}")]
    DiagonalLengthMismatch(usize, usize),

    /// The requested dimensions exceed the addressable element range.
    #[error("a {rows}x{cols} matrix exceeds the addressable element range")]
    SizeOverflow { rows: usize, cols: usize },

    /// Repeat counts for `repelem`/`repmat` must be positive.
    #[error("repeat counts must be positive: rows={rows}, cols={cols}")]
    ZeroRepeats { rows: usize, cols: usize },

    /// A dimension argument that must be positive was zero.
    #[error("{0} must be positive")]
    ZeroDimension(&'static str),

    /// A range step of zero never terminates.
    #[error("range step must not be zero")]
    ZeroStep,

    /// An n-ary operation received no operands.
    #[error("at least one matrix is required")]
    EmptyInput,

    /// Matrix is not square when a square matrix was required.
    #[error("non-square matrix: rows={rows}, cols={cols}")]
    NonSquare { rows: usize, cols: usize },

    /// A half-open range is reversed or extends past the dimension.
    #[error("invalid range {start}..{end} for a dimension of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// An offset lies outside the dimension.
    #[error("index {index} out of bounds for a dimension of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// `try_next` was called on an exhausted iterator.
    #[error("no more elements")]
    Exhausted,
}

impl MatrixError {
    /// The fault class this error belongs to.
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::NonSquare { .. } => FaultKind::State,
            Self::InvalidRange { .. } | Self::IndexOutOfBounds { .. } | Self::Exhausted => {
                FaultKind::Bounds
            }
            _ => FaultKind::Argument,
        }
    }
}

/// Result type for matrix operations.
pub type Result<T> = std::result::Result<T, MatrixError>;

// ============================================================================
// Shared validation helpers
// ============================================================================

/// Check that `range` is a valid half-open sub-range of `0..len`.
pub(crate) fn check_range(range: &std::ops::Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(MatrixError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

/// Number of elements in a `rows x cols` grid of `T`, or `SizeOverflow` if the grid
/// cannot be allocated.
pub(crate) fn checked_len<T>(rows: usize, cols: usize) -> Result<usize> {
    let len = rows
        .checked_mul(cols)
        .ok_or(MatrixError::SizeOverflow { rows, cols })?;
    let bytes = len
        .checked_mul(std::mem::size_of::<T>().max(1))
        .ok_or(MatrixError::SizeOverflow { rows, cols })?;
    if bytes > isize::MAX as usize {
        tracing::debug!(rows, cols, bytes, "rejecting oversized matrix");
        return Err(MatrixError::SizeOverflow { rows, cols });
    }
    Ok(len)
}
