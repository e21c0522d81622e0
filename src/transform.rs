//! Geometric transforms: slicing, padding, flips, rotations, reshaping, tiling and stacking.
//!
//! Every transform here returns a matrix with freshly allocated storage, except
//! [`Matrix::reverse_h`], [`Matrix::reverse_v`] and [`Matrix::flat_op`], which work in place.
//! Result sizes are checked before anything is allocated.

use std::ops::Range;

use crate::{check_range, checked_len, Matrix, MatrixError, Result};

/// Build a row-major `rows x cols` buffer from `f(i, j)`.
fn build<T>(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Vec<T> {
    let mut out = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            out.push(f(i, j));
        }
    }
    out
}

impl<T: Clone> Matrix<T> {
    // ------------------------------------------------------------------
    // Copy / slice
    // ------------------------------------------------------------------

    /// Copy of the rows in `rows` (all columns).
    pub fn copy_rows(&self, rows: Range<usize>) -> Result<Self> {
        check_range(&rows, self.rows())?;
        let cols = self.cols();
        let data = self.as_slice()[rows.start * cols..rows.end * cols].to_vec();
        Ok(Self::from_parts(rows.len(), cols, data))
    }

    /// Copy of the rectangle `rows x cols`.
    pub fn copy_range(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        check_range(&rows, self.rows())?;
        check_range(&cols, self.cols())?;
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for i in rows.clone() {
            data.extend_from_slice(&self.row(i)[cols.clone()]);
        }
        Ok(Self::from_parts(rows.len(), cols.len(), data))
    }

    // ------------------------------------------------------------------
    // Extend / pad
    // ------------------------------------------------------------------

    /// Resize to `new_rows x new_cols`, keeping the overlap and filling new cells with `fill`.
    ///
    /// When both dimensions shrink (or stay), this is a truncating copy.
    pub fn extend_with(&self, new_rows: usize, new_cols: usize, fill: T) -> Result<Self> {
        if new_rows <= self.rows() && new_cols <= self.cols() {
            tracing::trace!(new_rows, new_cols, "extend degenerates to a truncating copy");
            return self.copy_range(0..new_rows, 0..new_cols);
        }
        let len = checked_len::<T>(new_rows, new_cols)?;
        let mut data = Vec::with_capacity(len);
        let kept = new_cols.min(self.cols());
        for i in 0..new_rows {
            if i < self.rows() {
                data.extend_from_slice(&self.row(i)[..kept]);
                data.resize(data.len() + (new_cols - kept), fill.clone());
            } else {
                data.resize(data.len() + new_cols, fill.clone());
            }
        }
        Ok(Self::from_parts(new_rows, new_cols, data))
    }

    /// Pad `up` rows above, `down` below, `left` columns before and `right` after, with
    /// `fill` in every new cell.
    pub fn extend_sides_with(
        &self,
        up: usize,
        down: usize,
        left: usize,
        right: usize,
        fill: T,
    ) -> Result<Self> {
        if up == 0 && down == 0 && left == 0 && right == 0 {
            return Ok(self.clone());
        }
        let new_rows = sum3(up, self.rows(), down)?;
        let new_cols = sum3(left, self.cols(), right)?;
        let len = checked_len::<T>(new_rows, new_cols)?;
        let mut data = Vec::with_capacity(len);
        data.resize(up * new_cols, fill.clone());
        for i in 0..self.rows() {
            data.resize(data.len() + left, fill.clone());
            data.extend_from_slice(self.row(i));
            data.resize(data.len() + right, fill.clone());
        }
        data.resize(len, fill);
        Ok(Self::from_parts(new_rows, new_cols, data))
    }

    // ------------------------------------------------------------------
    // Flip / rotate / transpose
    // ------------------------------------------------------------------

    /// Copy with every row reversed.
    pub fn flip_h(&self) -> Self {
        let mut out = self.clone();
        out.reverse_h();
        out
    }

    /// Copy with the row order reversed.
    pub fn flip_v(&self) -> Self {
        let mut out = self.clone();
        out.reverse_v();
        out
    }

    /// Rotate 90 degrees clockwise: `rows x cols` becomes `cols x rows`.
    pub fn rotate90(&self) -> Self {
        let (rows, cols) = self.shape();
        let data = build(cols, rows, |i, j| self.get(rows - 1 - j, i).clone());
        Self::from_parts(cols, rows, data)
    }

    pub fn rotate180(&self) -> Self {
        let data = self.as_slice().iter().rev().cloned().collect();
        Self::from_parts(self.rows(), self.cols(), data)
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn rotate270(&self) -> Self {
        let (rows, cols) = self.shape();
        let data = build(cols, rows, |i, j| self.get(j, cols - 1 - i).clone());
        Self::from_parts(cols, rows, data)
    }

    pub fn transpose(&self) -> Self {
        let (rows, cols) = self.shape();
        let data = build(cols, rows, |i, j| self.get(j, i).clone());
        Self::from_parts(cols, rows, data)
    }

    // ------------------------------------------------------------------
    // Tiling / flatten / stacking
    // ------------------------------------------------------------------

    /// Repeat each element `row_repeats` times down and `col_repeats` times across.
    ///
    /// `[[1, 2]].repelem(2, 2) == [[1, 1, 2, 2], [1, 1, 2, 2]]`
    pub fn repelem(&self, row_repeats: usize, col_repeats: usize) -> Result<Self> {
        let (new_rows, new_cols) = self.tiled_shape(row_repeats, col_repeats)?;
        let data = build(new_rows, new_cols, |i, j| {
            self.get(i / row_repeats, j / col_repeats).clone()
        });
        Ok(Self::from_parts(new_rows, new_cols, data))
    }

    /// Tile the whole matrix `row_repeats x col_repeats` times.
    ///
    /// `[[1, 2]].repmat(2, 2) == [[1, 2, 1, 2], [1, 2, 1, 2]]`
    pub fn repmat(&self, row_repeats: usize, col_repeats: usize) -> Result<Self> {
        let (new_rows, new_cols) = self.tiled_shape(row_repeats, col_repeats)?;
        let mut data = Vec::with_capacity(new_rows * new_cols);
        for _ in 0..row_repeats {
            for i in 0..self.rows() {
                for _ in 0..col_repeats {
                    data.extend_from_slice(self.row(i));
                }
            }
        }
        Ok(Self::from_parts(new_rows, new_cols, data))
    }

    fn tiled_shape(&self, row_repeats: usize, col_repeats: usize) -> Result<(usize, usize)> {
        if row_repeats == 0 || col_repeats == 0 {
            return Err(MatrixError::ZeroRepeats {
                rows: row_repeats,
                cols: col_repeats,
            });
        }
        let overflow = MatrixError::SizeOverflow {
            rows: self.rows(),
            cols: self.cols(),
        };
        let new_rows = self.rows().checked_mul(row_repeats).ok_or(overflow.clone())?;
        let new_cols = self.cols().checked_mul(col_repeats).ok_or(overflow)?;
        checked_len::<T>(new_rows, new_cols)?;
        Ok((new_rows, new_cols))
    }

    /// All elements in row-major order.
    pub fn flatten(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Stack `other` below `self`; both must have the same number of columns.
    pub fn vstack(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.cols() {
            return Err(MatrixError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        let rows = self
            .rows()
            .checked_add(other.rows())
            .ok_or(MatrixError::SizeOverflow {
                rows: usize::MAX,
                cols: self.cols(),
            })?;
        let len = checked_len::<T>(rows, self.cols())?;
        let mut data = Vec::with_capacity(len);
        data.extend_from_slice(self.as_slice());
        data.extend_from_slice(other.as_slice());
        Ok(Self::from_parts(rows, self.cols(), data))
    }

    /// Place `other` to the right of `self`; both must have the same number of rows.
    pub fn hstack(&self, other: &Self) -> Result<Self> {
        if self.rows() != other.rows() {
            return Err(MatrixError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        let cols = self
            .cols()
            .checked_add(other.cols())
            .ok_or(MatrixError::SizeOverflow {
                rows: self.rows(),
                cols: usize::MAX,
            })?;
        let len = checked_len::<T>(self.rows(), cols)?;
        let mut data = Vec::with_capacity(len);
        for i in 0..self.rows() {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Self::from_parts(self.rows(), cols, data))
    }
}

impl<T: Clone + Default> Matrix<T> {
    /// [`Matrix::extend_with`] filling new cells with `T::default()`.
    pub fn extend(&self, new_rows: usize, new_cols: usize) -> Result<Self> {
        self.extend_with(new_rows, new_cols, T::default())
    }

    /// [`Matrix::extend_sides_with`] filling new cells with `T::default()`.
    pub fn extend_sides(&self, up: usize, down: usize, left: usize, right: usize) -> Result<Self> {
        self.extend_sides_with(up, down, left, right, T::default())
    }

    /// Lay the elements out again, row-major, as `new_rows x new_cols`.
    ///
    /// The element count does not have to match: target cells past the last source element
    /// are `T::default()`, and source elements past the last target cell are dropped.
    ///
    /// ```rust
    /// use dense_grid::Matrix;
    ///
    /// let m = Matrix::from([[1, 2], [3, 4], [5, 6]]);
    /// assert_eq!(m.reshape(2, 3).unwrap(), Matrix::from([[1, 2, 3], [4, 5, 6]]));
    /// assert_eq!(m.reshape(2, 4).unwrap(), Matrix::from([[1, 2, 3, 4], [5, 6, 0, 0]]));
    /// assert_eq!(m.reshape(1, 2).unwrap(), Matrix::from([[1, 2]]));
    /// ```
    pub fn reshape(&self, new_rows: usize, new_cols: usize) -> Result<Self> {
        let len = checked_len::<T>(new_rows, new_cols)?;
        let kept = len.min(self.count());
        let mut data = Vec::with_capacity(len);
        data.extend_from_slice(&self.as_slice()[..kept]);
        data.resize(len, T::default());
        Ok(Self::from_parts(new_rows, new_cols, data))
    }

    /// Reshape to `new_cols` columns and as many rows as needed to hold every element.
    pub fn reshape_cols(&self, new_cols: usize) -> Result<Self> {
        if new_cols == 0 {
            return Err(MatrixError::ZeroDimension("new_cols"));
        }
        self.reshape(self.count().div_ceil(new_cols), new_cols)
    }
}

impl<T> Matrix<T> {
    /// Reverse every row in place.
    pub fn reverse_h(&mut self) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        for row in self.as_mut_slice().chunks_mut(cols) {
            row.reverse();
        }
    }

    /// Reverse the order of rows in place.
    pub fn reverse_v(&mut self) {
        let (rows, cols) = self.shape();
        let data = self.as_mut_slice();
        for i in 0..rows / 2 {
            let (top, bottom) = data.split_at_mut((rows - 1 - i) * cols);
            top[i * cols..(i + 1) * cols].swap_with_slice(&mut bottom[..cols]);
        }
    }

    /// Hand the whole row-major buffer to `f` for in-place bulk work (sorting, filling).
    pub fn flat_op<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        f(self.as_mut_slice())
    }
}

fn sum3(a: usize, b: usize, c: usize) -> Result<usize> {
    a.checked_add(b)
        .and_then(|s| s.checked_add(c))
        .ok_or(MatrixError::SizeOverflow {
            rows: usize::MAX,
            cols: usize::MAX,
        })
}
