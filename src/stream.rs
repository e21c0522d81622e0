//! Row-major, column-major, diagonal and per-line traversal with O(1) skipping.
//!
//! All iterators borrow the matrix, yield `&T` (or nested iterators), and know exactly how
//! many items are left. [`SkipIterator::advance`] jumps ahead in constant time instead of
//! stepping, which is what `nth` uses as well.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::{check_range, Matrix, MatrixError, Result};

/// Iterators with a known remaining length and a constant-time bulk skip.
pub trait SkipIterator: ExactSizeIterator {
    /// Items left before the iterator is exhausted.
    fn remaining(&self) -> usize {
        self.len()
    }

    /// Skip the next `n` items. Skipping past the end leaves the iterator exhausted;
    /// `advance(0)` does nothing.
    fn advance(&mut self, n: usize);

    /// Like `next`, but reports exhaustion as [`MatrixError::Exhausted`].
    fn try_next(&mut self) -> Result<Self::Item> {
        self.next().ok_or(MatrixError::Exhausted)
    }
}

// ============================================================================
// Row-major
// ============================================================================

/// Row-major traversal over a run of whole rows.
#[derive(Debug, Clone)]
pub struct RowMajor<'a, T> {
    data: &'a [T],
    cursor: usize,
}

impl<'a, T> RowMajor<'a, T> {
    fn new(data: &'a [T]) -> Self {
        Self { data, cursor: 0 }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &'a [T] {
        &self.data[self.cursor..]
    }

    /// Clone the remaining elements, in order.
    pub fn to_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

impl<'a, T> Iterator for RowMajor<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let item = self.data.get(self.cursor)?;
        self.cursor += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.data.len() - self.cursor;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.advance(n);
        self.next()
    }
}

impl<T> ExactSizeIterator for RowMajor<'_, T> {}
impl<T> FusedIterator for RowMajor<'_, T> {}

impl<T> SkipIterator for RowMajor<'_, T> {
    fn advance(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_add(n).min(self.data.len());
    }
}

// ============================================================================
// Column-major
// ============================================================================

/// Column-major traversal over a run of whole columns.
///
/// The cursor is a `(row, col)` pair; skipping converts a linear count into a move down
/// the current column that wraps into the following columns.
#[derive(Debug, Clone)]
pub struct ColumnMajor<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    i: usize,
    j: usize,
    end_col: usize,
}

impl<'a, T> ColumnMajor<'a, T> {
    fn new(matrix: &'a Matrix<T>, cols: Range<usize>) -> Self {
        let (rows, width) = matrix.shape();
        // With no rows there is nothing to yield in any column.
        let j = if rows == 0 { cols.end } else { cols.start };
        Self {
            data: matrix.as_slice(),
            rows,
            cols: width,
            i: 0,
            j,
            end_col: cols.end,
        }
    }

    /// Clone the remaining elements, in column-major order.
    pub fn to_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        let mut first = self.i;
        for j in self.j..self.end_col {
            for i in first..self.rows {
                out.push(self.data[i * self.cols + j].clone());
            }
            first = 0;
        }
        out
    }
}

impl<'a, T> Iterator for ColumnMajor<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.j >= self.end_col {
            return None;
        }
        let item = &self.data[self.i * self.cols + self.j];
        self.i += 1;
        if self.i == self.rows {
            self.i = 0;
            self.j += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.end_col - self.j) * self.rows - self.i;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.advance(n);
        self.next()
    }
}

impl<T> ExactSizeIterator for ColumnMajor<'_, T> {}
impl<T> FusedIterator for ColumnMajor<'_, T> {}

impl<T> SkipIterator for ColumnMajor<'_, T> {
    fn advance(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        if n >= self.len() {
            self.i = 0;
            self.j = self.end_col;
            return;
        }
        let linear = self.i + n;
        self.j += linear / self.rows;
        self.i = linear % self.rows;
    }
}

// ============================================================================
// Diagonal
// ============================================================================

/// Traversal of the main diagonal or the anti-diagonal of a square matrix.
#[derive(Debug, Clone)]
pub struct Diagonal<'a, T> {
    data: &'a [T],
    n: usize,
    cursor: usize,
    anti: bool,
}

impl<'a, T> Iterator for Diagonal<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor >= self.n {
            return None;
        }
        let k = self.cursor;
        let col = if self.anti { self.n - 1 - k } else { k };
        self.cursor += 1;
        Some(&self.data[k * self.n + col])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.n - self.cursor;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.advance(n);
        self.next()
    }
}

impl<T> ExactSizeIterator for Diagonal<'_, T> {}
impl<T> FusedIterator for Diagonal<'_, T> {}

impl<T> SkipIterator for Diagonal<'_, T> {
    fn advance(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_add(n).min(self.n);
    }
}

// ============================================================================
// Per-row / per-column
// ============================================================================

/// Yields one [`RowMajor`] per row.
#[derive(Debug, Clone)]
pub struct Rows<'a, T> {
    matrix: &'a Matrix<T>,
    next_row: usize,
    end_row: usize,
}

impl<'a, T> Iterator for Rows<'a, T> {
    type Item = RowMajor<'a, T>;

    fn next(&mut self) -> Option<RowMajor<'a, T>> {
        if self.next_row >= self.end_row {
            return None;
        }
        let row = self.matrix.row(self.next_row);
        self.next_row += 1;
        Some(RowMajor::new(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end_row - self.next_row;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<RowMajor<'a, T>> {
        self.advance(n);
        self.next()
    }
}

impl<T> ExactSizeIterator for Rows<'_, T> {}
impl<T> FusedIterator for Rows<'_, T> {}

impl<T> SkipIterator for Rows<'_, T> {
    fn advance(&mut self, n: usize) {
        self.next_row = self.next_row.saturating_add(n).min(self.end_row);
    }
}

/// Yields one [`ColumnMajor`] per column.
#[derive(Debug, Clone)]
pub struct Columns<'a, T> {
    matrix: &'a Matrix<T>,
    next_col: usize,
    end_col: usize,
}

impl<'a, T> Iterator for Columns<'a, T> {
    type Item = ColumnMajor<'a, T>;

    fn next(&mut self) -> Option<ColumnMajor<'a, T>> {
        if self.next_col >= self.end_col {
            return None;
        }
        let j = self.next_col;
        self.next_col += 1;
        Some(ColumnMajor::new(self.matrix, j..j + 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end_col - self.next_col;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<ColumnMajor<'a, T>> {
        self.advance(n);
        self.next()
    }
}

impl<T> ExactSizeIterator for Columns<'_, T> {}
impl<T> FusedIterator for Columns<'_, T> {}

impl<T> SkipIterator for Columns<'_, T> {
    fn advance(&mut self, n: usize) {
        self.next_col = self.next_col.saturating_add(n).min(self.end_col);
    }
}

// ============================================================================
// Matrix entry points
// ============================================================================

impl<T> Matrix<T> {
    /// Row-major iterator over every element.
    pub fn iter(&self) -> RowMajor<'_, T> {
        self.stream_h()
    }

    /// Row-major iterator over every element.
    pub fn stream_h(&self) -> RowMajor<'_, T> {
        RowMajor::new(self.as_slice())
    }

    /// Iterator over row `i`.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn stream_h_row(&self, i: usize) -> RowMajor<'_, T> {
        RowMajor::new(self.row(i))
    }

    /// Row-major iterator over the rows in `rows`.
    pub fn stream_h_range(&self, rows: Range<usize>) -> Result<RowMajor<'_, T>> {
        check_range(&rows, self.rows())?;
        let cols = self.cols();
        Ok(RowMajor::new(
            &self.as_slice()[rows.start * cols..rows.end * cols],
        ))
    }

    /// Column-major iterator over every element.
    pub fn stream_v(&self) -> ColumnMajor<'_, T> {
        ColumnMajor::new(self, 0..self.cols())
    }

    /// Iterator down column `j`.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn stream_v_col(&self, j: usize) -> ColumnMajor<'_, T> {
        assert!(j < self.cols(), "column {j} out of bounds for {} columns", self.cols());
        ColumnMajor::new(self, j..j + 1)
    }

    /// Column-major iterator over the columns in `cols`.
    pub fn stream_v_range(&self, cols: Range<usize>) -> Result<ColumnMajor<'_, T>> {
        check_range(&cols, self.cols())?;
        Ok(ColumnMajor::new(self, cols))
    }

    /// Main diagonal, top-left to bottom-right.
    pub fn stream_lu2rd(&self) -> Result<Diagonal<'_, T>> {
        self.diagonal_stream(false)
    }

    /// Anti-diagonal, top-right to bottom-left.
    pub fn stream_ru2ld(&self) -> Result<Diagonal<'_, T>> {
        self.diagonal_stream(true)
    }

    fn diagonal_stream(&self, anti: bool) -> Result<Diagonal<'_, T>> {
        let n = self.check_square()?;
        Ok(Diagonal {
            data: self.as_slice(),
            n,
            cursor: 0,
            anti,
        })
    }

    /// One row iterator per row.
    pub fn stream_r(&self) -> Rows<'_, T> {
        Rows {
            matrix: self,
            next_row: 0,
            end_row: self.rows(),
        }
    }

    pub fn stream_r_range(&self, rows: Range<usize>) -> Result<Rows<'_, T>> {
        check_range(&rows, self.rows())?;
        Ok(Rows {
            matrix: self,
            next_row: rows.start,
            end_row: rows.end,
        })
    }

    /// One column iterator per column.
    pub fn stream_c(&self) -> Columns<'_, T> {
        Columns {
            matrix: self,
            next_col: 0,
            end_col: self.cols(),
        }
    }

    pub fn stream_c_range(&self, cols: Range<usize>) -> Result<Columns<'_, T>> {
        check_range(&cols, self.cols())?;
        Ok(Columns {
            matrix: self,
            next_col: cols.start,
            end_col: cols.end,
        })
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = RowMajor<'a, T>;

    fn into_iter(self) -> RowMajor<'a, T> {
        self.stream_h()
    }
}
