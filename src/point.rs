//! Cell coordinates, neighbour slots and point streams.

use std::fmt;
use std::ops::Range;

use crate::{check_range, Matrix, Result};

/// A `(row, col)` cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    #[inline]
    pub const fn of(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Point> for (usize, usize) {
    fn from(p: Point) -> Self {
        (p.row, p.col)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl<T> Matrix<T> {
    /// `Some(Point)` if `(row, col)` lies inside the grid.
    fn point_at(&self, row: Option<usize>, col: Option<usize>) -> Option<Point> {
        match (row, col) {
            (Some(r), Some(c)) if r < self.rows() && c < self.cols() => Some(Point::of(r, c)),
            _ => None,
        }
    }

    /// Orthogonal neighbours in the order up, right, down, left.
    ///
    /// Slots that fall outside the grid are `None`; the slot order never changes.
    pub fn adjacent4_points(&self, i: usize, j: usize) -> [Option<Point>; 4] {
        let (up, down) = (i.checked_sub(1), i.checked_add(1));
        let (left, right) = (j.checked_sub(1), j.checked_add(1));
        [
            self.point_at(up, Some(j)),
            self.point_at(Some(i), right),
            self.point_at(down, Some(j)),
            self.point_at(Some(i), left),
        ]
    }

    /// All eight neighbours in the order left-up, up, right-up, right, right-down, down,
    /// left-down, left.
    pub fn adjacent8_points(&self, i: usize, j: usize) -> [Option<Point>; 8] {
        let (up, down) = (i.checked_sub(1), i.checked_add(1));
        let (left, right) = (j.checked_sub(1), j.checked_add(1));
        [
            self.point_at(up, left),
            self.point_at(up, Some(j)),
            self.point_at(up, right),
            self.point_at(Some(i), right),
            self.point_at(down, right),
            self.point_at(down, Some(j)),
            self.point_at(down, left),
            self.point_at(Some(i), left),
        ]
    }

    /// Points of the main diagonal, top-left to bottom-right.
    pub fn points_lu2rd(&self) -> Result<impl ExactSizeIterator<Item = Point>> {
        let n = self.check_square()?;
        Ok((0..n).map(|i| Point::of(i, i)))
    }

    /// Points of the anti-diagonal, top-right to bottom-left.
    pub fn points_ru2ld(&self) -> Result<impl ExactSizeIterator<Item = Point>> {
        let n = self.check_square()?;
        Ok((0..n).map(move |i| Point::of(i, n - 1 - i)))
    }

    /// Every point in row-major order.
    pub fn points_h(&self) -> impl Iterator<Item = Point> {
        row_major_points(0..self.rows(), self.cols())
    }

    /// Points of the rows in `rows`, in row-major order.
    pub fn points_h_range(&self, rows: Range<usize>) -> Result<impl Iterator<Item = Point>> {
        check_range(&rows, self.rows())?;
        Ok(row_major_points(rows, self.cols()))
    }

    /// Every point in column-major order.
    pub fn points_v(&self) -> impl Iterator<Item = Point> {
        column_major_points(0..self.cols(), self.rows())
    }

    /// Points of the columns in `cols`, in column-major order.
    pub fn points_v_range(&self, cols: Range<usize>) -> Result<impl Iterator<Item = Point>> {
        check_range(&cols, self.cols())?;
        Ok(column_major_points(cols, self.rows()))
    }

    /// One point iterator per row.
    pub fn points_r(
        &self,
    ) -> impl ExactSizeIterator<Item = impl ExactSizeIterator<Item = Point>> {
        let cols = self.cols();
        (0..self.rows()).map(move |i| (0..cols).map(move |j| Point::of(i, j)))
    }

    pub fn points_r_range(
        &self,
        rows: Range<usize>,
    ) -> Result<impl ExactSizeIterator<Item = impl ExactSizeIterator<Item = Point>>> {
        check_range(&rows, self.rows())?;
        let cols = self.cols();
        Ok(rows.map(move |i| (0..cols).map(move |j| Point::of(i, j))))
    }

    /// One point iterator per column.
    pub fn points_c(
        &self,
    ) -> impl ExactSizeIterator<Item = impl ExactSizeIterator<Item = Point>> {
        let rows = self.rows();
        (0..self.cols()).map(move |j| (0..rows).map(move |i| Point::of(i, j)))
    }

    pub fn points_c_range(
        &self,
        cols: Range<usize>,
    ) -> Result<impl ExactSizeIterator<Item = impl ExactSizeIterator<Item = Point>>> {
        check_range(&cols, self.cols())?;
        let rows = self.rows();
        Ok(cols.map(move |j| (0..rows).map(move |i| Point::of(i, j))))
    }
}

fn row_major_points(rows: Range<usize>, cols: usize) -> impl Iterator<Item = Point> {
    rows.flat_map(move |i| (0..cols).map(move |j| Point::of(i, j)))
}

fn column_major_points(cols: Range<usize>, rows: usize) -> impl Iterator<Item = Point> {
    cols.flat_map(move |j| (0..rows).map(move |i| Point::of(i, j)))
}
