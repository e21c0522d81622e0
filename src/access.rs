//! Element, row, column and diagonal addressing.

use std::ops::{Index, IndexMut};

use crate::{Matrix, MatrixError, Point, Result};

impl<T> Matrix<T> {
    /// Reference to the element at `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows` or `j >= cols`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.as_slice()[self.offset(i, j)]
    }

    /// Overwrite the element at `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows` or `j >= cols`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let k = self.offset(i, j);
        self.as_mut_slice()[k] = value;
    }

    #[inline]
    pub fn get_point(&self, p: Point) -> &T {
        self.get(p.row, p.col)
    }

    #[inline]
    pub fn set_point(&mut self, p: Point, value: T) {
        self.set(p.row, p.col, value)
    }

    fn cell(&self, i: Option<usize>, j: Option<usize>) -> Option<&T> {
        match (i, j) {
            (Some(i), Some(j)) if i < self.rows() && j < self.cols() => {
                Some(&self.as_slice()[i * self.cols() + j])
            }
            _ => None,
        }
    }

    /// The element above `(i, j)`, or `None` on the top edge.
    pub fn up_of(&self, i: usize, j: usize) -> Option<&T> {
        self.cell(i.checked_sub(1), Some(j))
    }

    /// The element below `(i, j)`, or `None` on the bottom edge.
    pub fn down_of(&self, i: usize, j: usize) -> Option<&T> {
        self.cell(i.checked_add(1), Some(j))
    }

    /// The element left of `(i, j)`, or `None` on the left edge.
    pub fn left_of(&self, i: usize, j: usize) -> Option<&T> {
        self.cell(Some(i), j.checked_sub(1))
    }

    /// The element right of `(i, j)`, or `None` on the right edge.
    pub fn right_of(&self, i: usize, j: usize) -> Option<&T> {
        self.cell(Some(i), j.checked_add(1))
    }

    // ------------------------------------------------------------------
    // Rows and columns
    // ------------------------------------------------------------------

    /// Row `i` as a slice of the backing storage.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.rows(), "row {i} out of bounds for {} rows", self.rows());
        let cols = self.cols();
        &self.as_slice()[i * cols..(i + 1) * cols]
    }

    /// Row `i` as a mutable slice; writes go straight to the matrix.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.rows(), "row {i} out of bounds for {} rows", self.rows());
        let cols = self.cols();
        &mut self.as_mut_slice()[i * cols..(i + 1) * cols]
    }

    /// Row `i`, or `None` if there is no such row.
    pub fn get_row(&self, i: usize) -> Option<&[T]> {
        (i < self.rows()).then(|| self.row(i))
    }

    /// Replace every element of row `i` with `f(element)`.
    pub fn update_row(&mut self, i: usize, mut f: impl FnMut(&T) -> T) {
        for x in self.row_mut(i) {
            let v = f(x);
            *x = v;
        }
    }

    /// Replace every element of column `j` with `f(element)`.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn update_column(&mut self, j: usize, mut f: impl FnMut(&T) -> T) {
        assert!(j < self.cols(), "column {j} out of bounds for {} columns", self.cols());
        let cols = self.cols();
        for x in self.as_mut_slice().iter_mut().skip(j).step_by(cols) {
            let v = f(x);
            *x = v;
        }
    }

    // ------------------------------------------------------------------
    // Diagonals
    // ------------------------------------------------------------------

    /// Side length of a square matrix, or `NonSquare`.
    pub(crate) fn check_square(&self) -> Result<usize> {
        if self.rows() != self.cols() {
            return Err(MatrixError::NonSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.rows())
    }

    /// Apply `f` to each main-diagonal element in place.
    pub fn update_lu2rd(&mut self, mut f: impl FnMut(&T) -> T) -> Result<()> {
        let n = self.check_square()?;
        let data = self.as_mut_slice();
        for i in 0..n {
            let x = &mut data[i * n + i];
            let v = f(x);
            *x = v;
        }
        Ok(())
    }

    /// Apply `f` to each anti-diagonal element in place.
    pub fn update_ru2ld(&mut self, mut f: impl FnMut(&T) -> T) -> Result<()> {
        let n = self.check_square()?;
        let data = self.as_mut_slice();
        for i in 0..n {
            let x = &mut data[i * n + (n - 1 - i)];
            let v = f(x);
            *x = v;
        }
        Ok(())
    }
}

impl<T: Clone> Matrix<T> {
    /// A copy of column `j`.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn column(&self, j: usize) -> Vec<T> {
        assert!(j < self.cols(), "column {j} out of bounds for {} columns", self.cols());
        self.as_slice()
            .iter()
            .skip(j)
            .step_by(self.cols())
            .cloned()
            .collect()
    }

    /// Overwrite row `i`; `values` must hold exactly `cols` elements.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn set_row(&mut self, i: usize, values: &[T]) -> Result<()> {
        if values.len() != self.cols() {
            return Err(MatrixError::LengthMismatch {
                expected: self.cols(),
                actual: values.len(),
            });
        }
        self.row_mut(i).clone_from_slice(values);
        Ok(())
    }

    /// Overwrite column `j`; `values` must hold exactly `rows` elements.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn set_column(&mut self, j: usize, values: &[T]) -> Result<()> {
        if values.len() != self.rows() {
            return Err(MatrixError::LengthMismatch {
                expected: self.rows(),
                actual: values.len(),
            });
        }
        assert!(j < self.cols(), "column {j} out of bounds for {} columns", self.cols());
        let cols = self.cols();
        let column = self.as_mut_slice().iter_mut().skip(j).step_by(cols);
        for (x, v) in column.zip(values) {
            x.clone_from(v);
        }
        Ok(())
    }

    /// The main diagonal, top-left to bottom-right.
    pub fn get_lu2rd(&self) -> Result<Vec<T>> {
        let n = self.check_square()?;
        Ok((0..n).map(|i| self.as_slice()[i * n + i].clone()).collect())
    }

    /// The anti-diagonal, top-right to bottom-left.
    pub fn get_ru2ld(&self) -> Result<Vec<T>> {
        let n = self.check_square()?;
        Ok((0..n)
            .map(|i| self.as_slice()[i * n + (n - 1 - i)].clone())
            .collect())
    }

    /// Overwrite the main diagonal with the first `rows` entries of `diagonal`.
    pub fn set_lu2rd(&mut self, diagonal: &[T]) -> Result<()> {
        let n = self.check_diagonal_arg(diagonal)?;
        let data = self.as_mut_slice();
        for (i, v) in diagonal.iter().take(n).enumerate() {
            data[i * n + i].clone_from(v);
        }
        Ok(())
    }

    /// Overwrite the anti-diagonal with the first `rows` entries of `diagonal`.
    pub fn set_ru2ld(&mut self, diagonal: &[T]) -> Result<()> {
        let n = self.check_diagonal_arg(diagonal)?;
        let data = self.as_mut_slice();
        for (i, v) in diagonal.iter().take(n).enumerate() {
            data[i * n + (n - 1 - i)].clone_from(v);
        }
        Ok(())
    }

    fn check_diagonal_arg(&self, diagonal: &[T]) -> Result<usize> {
        let n = self.check_square()?;
        if diagonal.len() < n {
            return Err(MatrixError::DiagonalTooShort {
                required: n,
                actual: diagonal.len(),
            });
        }
        Ok(n)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        self.get(i, j)
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let k = self.offset(i, j);
        &mut self.as_mut_slice()[k]
    }
}

impl<T> Index<Point> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, p: Point) -> &T {
        self.get(p.row, p.col)
    }
}

impl<T> IndexMut<Point> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, p: Point) -> &mut T {
        &mut self[(p.row, p.col)]
    }
}
