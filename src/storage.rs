//! Owned dense grid storage and structural factories.

use std::fmt;

use num_traits::PrimInt;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::{checked_len, MatrixError, Result};

// ============================================================================
// Matrix
// ============================================================================

/// Owned dense 2-D grid laid out in row-major order.
///
/// Row `i` is the contiguous slice `data[i * cols .. (i + 1) * cols]`. A matrix with zero
/// rows or zero columns is always normalised to the canonical 0x0 empty matrix.
///
/// Matrices built with [`Matrix::from_vec`] or [`Matrix::from_rows`] take over the caller's
/// storage without cloning any element. Every transform returns a matrix with freshly
/// allocated storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Matrix<T> {
    /// The canonical 0x0 matrix.
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Assemble a matrix from parts whose lengths the caller has already validated.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        if rows == 0 || cols == 0 {
            return Self::empty();
        }
        Self { data, rows, cols }
    }

    /// Wrap a flat row-major buffer.
    ///
    /// The buffer is moved in as is. Its length must be exactly `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_len::<T>(rows, cols)?;
        if data.len() != len {
            return Err(MatrixError::DataLengthMismatch {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Self::from_parts(rows, cols, data))
    }

    /// Build a matrix from a vector of rows, which must all have the first row's length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let expected = match rows.first() {
            Some(first) => first.len(),
            None => return Ok(Self::empty()),
        };
        for (row, r) in rows.iter().enumerate() {
            if r.len() != expected {
                return Err(MatrixError::RaggedRows {
                    row,
                    len: r.len(),
                    expected,
                });
            }
        }
        let nrows = rows.len();
        let len = checked_len::<T>(nrows, expected)?;
        let mut data = Vec::with_capacity(len);
        for r in rows {
            data.extend(r);
        }
        Ok(Self::from_parts(nrows, expected, data))
    }

    /// A single-row matrix over `data`.
    pub fn row_vector(data: Vec<T>) -> Self {
        let cols = data.len();
        Self::from_parts(1, cols, data)
    }

    /// Build a matrix by converting rows of a different element type.
    ///
    /// Every row must have the same length as the first one.
    pub fn create<U, R>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[U]>,
        U: Clone,
        T: From<U>,
    {
        let expected = match rows.first() {
            Some(first) => first.as_ref().len(),
            None => return Ok(Self::empty()),
        };
        for (row, r) in rows.iter().enumerate() {
            let len = r.as_ref().len();
            if len != expected {
                return Err(MatrixError::RaggedRows { row, len, expected });
            }
        }
        let len = checked_len::<T>(rows.len(), expected)?;
        let mut data = Vec::with_capacity(len);
        for r in rows {
            data.extend(r.as_ref().iter().cloned().map(T::from));
        }
        Ok(Self::from_parts(rows.len(), expected, data))
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (`rows * cols`).
    #[inline]
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `other` has the same number of rows and columns.
    pub fn is_same_shape<U>(&self, other: &Matrix<U>) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Return the underlying row-major data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Return the underlying row-major data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix and return its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub(crate) fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for a {}x{} matrix",
            self.rows,
            self.cols
        );
        i * self.cols + j
    }
}

impl<T: Clone> Matrix<T> {
    /// A single-row matrix holding `len` copies of `value`.
    pub fn repeat(value: T, len: usize) -> Self {
        Self::row_vector(vec![value; len])
    }

    /// Element-wise conversion into another element type.
    pub fn convert<U: From<T>>(&self) -> Matrix<U> {
        let data = self.data.iter().cloned().map(U::from).collect();
        Matrix::from_parts(self.rows, self.cols, data)
    }
}

// ============================================================================
// Diagonal factories
// ============================================================================

impl<T: Clone + Default> Matrix<T> {
    /// Square matrix with `diagonal` on the main diagonal and `T::default()` elsewhere.
    pub fn diagonal_lu2rd(diagonal: &[T]) -> Result<Self> {
        Self::diagonal(diagonal, &[])
    }

    /// Square matrix with `diagonal` on the anti-diagonal and `T::default()` elsewhere.
    pub fn diagonal_ru2ld(diagonal: &[T]) -> Result<Self> {
        Self::diagonal(&[], diagonal)
    }

    /// Square matrix with both diagonals set.
    ///
    /// Either argument may be empty; if both are non-empty they must have the same length.
    /// Where the diagonals cross (odd sizes) the anti-diagonal value wins.
    pub fn diagonal(lu2rd: &[T], ru2ld: &[T]) -> Result<Self> {
        if !lu2rd.is_empty() && !ru2ld.is_empty() && lu2rd.len() != ru2ld.len() {
            return Err(MatrixError::DiagonalLengthMismatch(lu2rd.len(), ru2ld.len()));
        }
        let n = lu2rd.len().max(ru2ld.len());
        let len = checked_len::<T>(n, n)?;
        let mut data = vec![T::default(); len];
        for (i, v) in lu2rd.iter().enumerate() {
            data[i * n + i] = v.clone();
        }
        for (i, v) in ru2ld.iter().enumerate() {
            data[i * n + (n - 1 - i)] = v.clone();
        }
        Ok(Self::from_parts(n, n, data))
    }
}

// ============================================================================
// Range and random factories
// ============================================================================

impl<T: PrimInt> Matrix<T> {
    /// Single-row matrix `[start, start + 1, ..., end - 1]`.
    pub fn range(start: T, end: T) -> Self {
        Self::row_vector(stepped(start, end, T::one(), false))
    }

    /// Single-row matrix stepping from `start` towards `end` (exclusive).
    ///
    /// A step pointing away from `end` yields an empty matrix.
    pub fn range_step(start: T, end: T, step: T) -> Result<Self> {
        if step.is_zero() {
            return Err(MatrixError::ZeroStep);
        }
        Ok(Self::row_vector(stepped(start, end, step, false)))
    }

    /// Single-row matrix `[start, ..., end]`.
    pub fn range_closed(start: T, end: T) -> Self {
        Self::row_vector(stepped(start, end, T::one(), true))
    }

    /// Single-row matrix stepping from `start` towards `end` (inclusive).
    pub fn range_closed_step(start: T, end: T, step: T) -> Result<Self> {
        if step.is_zero() {
            return Err(MatrixError::ZeroStep);
        }
        Ok(Self::row_vector(stepped(start, end, step, true)))
    }
}

/// Arithmetic progression from `start` towards `end`; `step` must be non-zero.
fn stepped<T: PrimInt>(start: T, end: T, step: T, inclusive: bool) -> Vec<T> {
    let ascending = step > T::zero();
    let mut out = Vec::new();
    let mut cur = start;
    loop {
        let in_range = if ascending { cur < end } else { cur > end };
        if !(in_range || (inclusive && cur == end)) {
            break;
        }
        out.push(cur);
        match cur.checked_add(&step) {
            Some(next) => cur = next,
            None => break,
        }
    }
    out
}

impl<T> Matrix<T>
where
    Standard: Distribution<T>,
{
    /// Single-row matrix of `len` values drawn from the thread-local generator.
    pub fn random(len: usize) -> Self {
        Self::random_with(&mut rand::thread_rng(), len)
    }

    /// Single-row matrix of `len` values drawn from `rng`.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let data = (0..len).map(|_| rng.gen()).collect();
        Self::row_vector(data)
    }
}

// ============================================================================
// Conversions and formatting
// ============================================================================

impl<T, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T> {
    fn from(rows: [[T; C]; R]) -> Self {
        let data = rows.into_iter().flatten().collect();
        Self::from_parts(R, C, data)
    }
}

impl<T> TryFrom<Vec<Vec<T>>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl<T> IntoIterator for Matrix<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    /// Consume the matrix in row-major order.
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for i in 0..self.rows {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("[")?;
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{v}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}
