//! Element-wise kernels: map, update, replace, fill, zip and arithmetic.
//!
//! Whole-grid kernels go through [`crate::dispatch`], so they run on the rayon pool when the
//! work estimate is large enough. Closures passed here may therefore be called from several
//! threads at once and in any order; they must not rely on visiting order.

use std::ops::Range;

use crate::dispatch::{self, should_parallelize};
use crate::{checked_len, Element, Matrix, MatrixError, MaybeSend, MaybeSendSync, Result, Scalar};

fn ensure_same_shape<A, B>(a: &Matrix<A>, b: &Matrix<B>) -> Result<()> {
    if !a.is_same_shape(b) {
        return Err(MatrixError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

impl<T: Element> Matrix<T> {
    // ------------------------------------------------------------------
    // Map / update / replace
    // ------------------------------------------------------------------

    /// New matrix with `f` applied to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(&T) -> T + MaybeSendSync,
    {
        self.map_to(f)
    }

    /// New matrix of another element type with `f` applied to every element.
    pub fn map_to<U, F>(&self, f: F) -> Matrix<U>
    where
        U: MaybeSend,
        F: Fn(&T) -> U + MaybeSendSync,
    {
        let (rows, cols) = self.shape();
        let src = self.as_slice();
        let data = dispatch::generate(rows, cols, should_parallelize(self.count()), |i, j| {
            f(&src[i * cols + j])
        });
        Matrix::from_parts(rows, cols, data)
    }

    /// Replace every element with `f(element)`.
    pub fn update_all<F>(&mut self, f: F)
    where
        F: Fn(&T) -> T + MaybeSendSync,
    {
        let (parallel, cols) = (should_parallelize(self.count()), self.cols());
        dispatch::update(self.as_mut_slice(), cols, parallel, |_, _, x| {
            let v = f(x);
            *x = v;
        });
    }

    /// Replace every element with `f(row, col)`.
    pub fn update_all_indexed<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> T + MaybeSendSync,
    {
        let (parallel, cols) = (should_parallelize(self.count()), self.cols());
        dispatch::update(self.as_mut_slice(), cols, parallel, |i, j, x| *x = f(i, j));
    }

    /// Overwrite every element matching `predicate` with `value`.
    pub fn replace_if<P>(&mut self, predicate: P, value: T)
    where
        P: Fn(&T) -> bool + MaybeSendSync,
    {
        let (parallel, cols) = (should_parallelize(self.count()), self.cols());
        dispatch::update(self.as_mut_slice(), cols, parallel, |_, _, x| {
            if predicate(x) {
                x.clone_from(&value);
            }
        });
    }

    /// Overwrite every element whose position matches `predicate` with `value`.
    pub fn replace_if_indexed<P>(&mut self, predicate: P, value: T)
    where
        P: Fn(usize, usize) -> bool + MaybeSendSync,
    {
        let (parallel, cols) = (should_parallelize(self.count()), self.cols());
        dispatch::update(self.as_mut_slice(), cols, parallel, |i, j, x| {
            if predicate(i, j) {
                x.clone_from(&value);
            }
        });
    }

    // ------------------------------------------------------------------
    // Visiting
    // ------------------------------------------------------------------

    /// Call `f` on every element. Order is row-major only when running sequentially.
    pub fn for_each<F>(&self, f: F)
    where
        F: Fn(&T) + MaybeSendSync,
    {
        self.for_each_indexed(|_, _, x| f(x));
    }

    /// Call `f` on every element of the sub-rectangle `rows x cols`.
    pub fn for_each_range<F>(&self, rows: Range<usize>, cols: Range<usize>, f: F) -> Result<()>
    where
        F: Fn(&T) + MaybeSendSync,
    {
        let work = rows.len().saturating_mul(cols.len());
        let width = self.cols();
        let src = self.as_slice();
        dispatch::run_range(rows, cols, self.shape(), should_parallelize(work), |i, j| {
            f(&src[i * width + j])
        })
    }

    /// Call `f(row, col, element)` on every element.
    pub fn for_each_indexed<F>(&self, f: F)
    where
        F: Fn(usize, usize, &T) + MaybeSendSync,
    {
        let (rows, cols) = self.shape();
        let src = self.as_slice();
        dispatch::run(rows, cols, should_parallelize(self.count()), |i, j| {
            f(i, j, &src[i * cols + j])
        });
    }

    // ------------------------------------------------------------------
    // Zips
    // ------------------------------------------------------------------

    /// Combine with a same-shaped matrix cell by cell.
    pub fn zip_with<U, R, F>(&self, other: &Matrix<U>, f: F) -> Result<Matrix<R>>
    where
        U: Element,
        R: MaybeSend,
        F: Fn(&T, &U) -> R + MaybeSendSync,
    {
        ensure_same_shape(self, other)?;
        let (rows, cols) = self.shape();
        let (a, b) = (self.as_slice(), other.as_slice());
        let data = dispatch::generate(rows, cols, should_parallelize(self.count()), |i, j| {
            let k = i * cols + j;
            f(&a[k], &b[k])
        });
        Ok(Matrix::from_parts(rows, cols, data))
    }

    /// Combine with two same-shaped matrices cell by cell.
    pub fn zip_with3<U, V, R, F>(
        &self,
        second: &Matrix<U>,
        third: &Matrix<V>,
        f: F,
    ) -> Result<Matrix<R>>
    where
        U: Element,
        V: Element,
        R: MaybeSend,
        F: Fn(&T, &U, &V) -> R + MaybeSendSync,
    {
        ensure_same_shape(self, second)?;
        ensure_same_shape(self, third)?;
        let (rows, cols) = self.shape();
        let (a, b, c) = (self.as_slice(), second.as_slice(), third.as_slice());
        let data = dispatch::generate(rows, cols, should_parallelize(self.count()), |i, j| {
            let k = i * cols + j;
            f(&a[k], &b[k], &c[k])
        });
        Ok(Matrix::from_parts(rows, cols, data))
    }
}

impl<T: Clone> Matrix<T> {
    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Copy `source` into the top-left corner, clipped to this matrix.
    pub fn fill_from(&mut self, source: &Matrix<T>) {
        // (0, 0) is always a valid origin.
        let _ = self.fill_from_at(0, 0, source);
    }

    /// Copy `source` into this matrix with its top-left corner at `(row, col)`.
    ///
    /// Only the overlapping region is written. `row == rows` or `col == cols` is accepted
    /// and writes nothing.
    pub fn fill_from_at(&mut self, row: usize, col: usize, source: &Matrix<T>) -> Result<()> {
        if row > self.rows() {
            return Err(MatrixError::IndexOutOfBounds {
                index: row,
                len: self.rows(),
            });
        }
        if col > self.cols() {
            return Err(MatrixError::IndexOutOfBounds {
                index: col,
                len: self.cols(),
            });
        }
        let n_rows = (self.rows() - row).min(source.rows());
        let n_cols = (self.cols() - col).min(source.cols());
        for i in 0..n_rows {
            self.row_mut(row + i)[col..col + n_cols].clone_from_slice(&source.row(i)[..n_cols]);
        }
        Ok(())
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl<T: Scalar> Matrix<T> {
    /// Cell-wise sum of two same-shaped matrices.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |&a, &b| a + b)
    }

    /// Cell-wise difference of two same-shaped matrices.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |&a, &b| a - b)
    }

    /// Matrix product; `self.cols()` must equal `other.rows()`.
    ///
    /// Each output cell is computed by one task as a serial sum over the inner dimension.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.rows() {
            return Err(MatrixError::InnerDimensionMismatch {
                lhs_cols: self.cols(),
                rhs_rows: other.rows(),
            });
        }
        let (rows, inner, cols) = (self.rows(), self.cols(), other.cols());
        checked_len::<T>(rows, cols)?;
        let work = self.count().saturating_mul(cols);
        let (a, b) = (self.as_slice(), other.as_slice());
        let data = dispatch::generate(rows, cols, should_parallelize(work), |i, j| {
            let lhs = &a[i * inner..(i + 1) * inner];
            lhs.iter()
                .enumerate()
                .fold(T::zero(), |acc, (k, &x)| acc + x * b[k * cols + j])
        });
        Ok(Self::from_parts(rows, cols, data))
    }
}

// ============================================================================
// N-ary helpers
// ============================================================================

/// Whether every matrix has the same shape (vacuously true for an empty slice).
pub fn is_same_shape_all<T>(matrices: &[&Matrix<T>]) -> bool {
    match matrices.split_first() {
        Some((first, rest)) => rest.iter().all(|m| first.is_same_shape(m)),
        None => true,
    }
}

fn check_all_same_shape<T>(matrices: &[&Matrix<T>]) -> Result<(usize, usize)> {
    let (first, rest) = matrices.split_first().ok_or(MatrixError::EmptyInput)?;
    for m in rest {
        ensure_same_shape(first, m)?;
    }
    Ok(first.shape())
}

/// Fold `f` left to right across same-shaped matrices, cell by cell.
///
/// A single matrix is returned as a copy.
pub fn zip_all<T, F>(matrices: &[&Matrix<T>], f: F) -> Result<Matrix<T>>
where
    T: Element,
    F: Fn(&T, &T) -> T + MaybeSendSync,
{
    let (rows, cols) = check_all_same_shape(matrices)?;
    if let [only] = matrices {
        return Ok((*only).clone());
    }
    let slices: Vec<&[T]> = matrices.iter().map(|m| m.as_slice()).collect();
    let work = (rows * cols).saturating_mul(slices.len());
    let data = dispatch::generate(rows, cols, should_parallelize(work), |i, j| {
        let k = i * cols + j;
        let mut acc = f(&slices[0][k], &slices[1][k]);
        for s in &slices[2..] {
            acc = f(&acc, &s[k]);
        }
        acc
    });
    Ok(Matrix::from_parts(rows, cols, data))
}

/// Apply an n-ary `f` to the cells at each position of same-shaped matrices.
///
/// `f` receives the cells in the order the matrices were given.
pub fn zip_all_with<T, R, F>(matrices: &[&Matrix<T>], f: F) -> Result<Matrix<R>>
where
    T: Element,
    R: MaybeSend,
    F: Fn(&[T]) -> R + MaybeSendSync,
{
    let (rows, cols) = check_all_same_shape(matrices)?;
    let slices: Vec<&[T]> = matrices.iter().map(|m| m.as_slice()).collect();
    let work = (rows * cols).saturating_mul(slices.len());
    let data = dispatch::generate(rows, cols, should_parallelize(work), |i, j| {
        let k = i * cols + j;
        let cells: Vec<T> = slices.iter().map(|s| s[k].clone()).collect();
        f(&cells)
    });
    Ok(Matrix::from_parts(rows, cols, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{with_parallel_mode, ParallelMode};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    #[test]
    fn test_map_and_map_to() {
        let m = Matrix::from([[1, 2], [3, 4]]);
        assert_eq!(m.map(|x| x * x), Matrix::from([[1, 4], [9, 16]]));
        let s: Matrix<String> = m.map_to(|x| format!("<{x}>"));
        assert_eq!(s[(1, 0)], "<3>");
        let f: Matrix<f64> = m.map_to(|&x| f64::from(x) / 2.0);
        assert_eq!(f.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_map_parallel_matches_sequential() {
        let m = Matrix::from_vec(100, 100, (0..10_000i64).collect()).unwrap();
        let seq = with_parallel_mode(ParallelMode::Disabled, || m.map(|x| x * 3 - 1));
        let par = with_parallel_mode(ParallelMode::Enabled, || m.map(|x| x * 3 - 1));
        let auto = m.map(|x| x * 3 - 1);
        assert_eq!(seq, par);
        assert_eq!(seq, auto);
        assert_eq!(*seq.get(99, 99), 9_999 * 3 - 1);
    }

    #[test]
    fn test_update_all_and_indexed() {
        let mut m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        m.update_all(|x| x + 10);
        assert_eq!(m, Matrix::from([[11, 12, 13], [14, 15, 16]]));
        m.update_all_indexed(|i, j| (i * 10 + j) as i32);
        assert_eq!(m, Matrix::from([[0, 1, 2], [10, 11, 12]]));
    }

    #[test]
    fn test_replace_if() {
        let mut m = Matrix::from([[1, -2], [-3, 4]]);
        m.replace_if(|&x| x < 0, 0);
        assert_eq!(m, Matrix::from([[1, 0], [0, 4]]));
        m.replace_if_indexed(|i, j| i == j, 7);
        assert_eq!(m, Matrix::from([[7, 0], [0, 7]]));
    }

    #[test]
    fn test_fill_variants() {
        let mut m = Matrix::from([[0; 3]; 3]);
        m.fill(1);
        assert!(m.iter().all(|&x| x == 1));

        m.fill_from(&Matrix::from([[5, 5, 5, 5], [5, 5, 5, 5]]));
        assert_eq!(m, Matrix::from([[5, 5, 5], [5, 5, 5], [1, 1, 1]]));

        m.fill_from_at(1, 2, &Matrix::from([[8, 8], [8, 8], [8, 8]]))
            .unwrap();
        assert_eq!(m, Matrix::from([[5, 5, 5], [5, 5, 8], [1, 1, 8]]));

        m.fill_from_at(3, 0, &Matrix::from([[9]])).unwrap();
        assert_eq!(
            m.fill_from_at(4, 0, &Matrix::from([[9]])),
            Err(MatrixError::IndexOutOfBounds { index: 4, len: 3 })
        );
        assert!(!m.iter().any(|&x| x == 9));
    }

    #[test]
    fn test_for_each_variants() {
        let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let sum = AtomicI64::new(0);
        m.for_each(|&x| {
            sum.fetch_add(x, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), 21);

        let sum = AtomicI64::new(0);
        m.for_each_range(0..2, 1..2, |&x| {
            sum.fetch_add(x, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(sum.load(Ordering::Relaxed), 7);
        assert!(m.for_each_range(0..3, 0..1, |_| {}).is_err());

        let hits = AtomicUsize::new(0);
        m.for_each_indexed(|i, j, &x| {
            assert_eq!(x as usize, i * 3 + j + 1);
            hits.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(hits.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_zip_with() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let b = Matrix::from([[true, false], [false, true]]);
        let z = a.zip_with(&b, |&x, &keep| if keep { x } else { 0 }).unwrap();
        assert_eq!(z, Matrix::from([[1, 0], [0, 4]]));

        let c = Matrix::from([[10, 20], [30, 40]]);
        let w = a.zip_with3(&c, &a, |x, y, z| x + y + z).unwrap();
        assert_eq!(w, Matrix::from([[12, 24], [36, 48]]));

        let bad = Matrix::from([[1, 2]]);
        assert_eq!(
            a.zip_with(&bad, |x, y| x + y),
            Err(MatrixError::ShapeMismatch {
                left: (2, 2),
                right: (1, 2)
            })
        );
        assert!(a.zip_with3(&a, &bad, |x, _, _| *x).is_err());
    }

    #[test]
    fn test_add_subtract() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let b = Matrix::from([[10, 20], [30, 40]]);
        assert_eq!(a.add(&b).unwrap(), Matrix::from([[11, 22], [33, 44]]));
        assert_eq!(b.subtract(&a).unwrap(), Matrix::from([[9, 18], [27, 36]]));
        assert!(a.add(&Matrix::from([[1, 2, 3]])).is_err());
    }

    #[test]
    fn test_multiply() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let b = Matrix::from([[5, 6], [7, 8]]);
        assert_eq!(a.multiply(&b).unwrap(), Matrix::from([[19, 22], [43, 50]]));

        let row = Matrix::from([[1, 2, 3]]);
        let col = Matrix::from([[4], [5], [6]]);
        assert_eq!(row.multiply(&col).unwrap(), Matrix::from([[32]]));
        assert_eq!(
            col.multiply(&row).unwrap(),
            Matrix::from([[4, 8, 12], [5, 10, 15], [6, 12, 18]])
        );
        assert_eq!(
            row.multiply(&row),
            Err(MatrixError::InnerDimensionMismatch {
                lhs_cols: 3,
                rhs_rows: 1
            })
        );
    }

    #[test]
    fn test_multiply_parallel_matches_sequential() {
        let a = Matrix::from_vec(40, 30, (0..1200).map(|x| (x % 17) as i64).collect()).unwrap();
        let b = Matrix::from_vec(30, 50, (0..1500).map(|x| (x % 13) as i64 - 6).collect())
            .unwrap();
        let seq = with_parallel_mode(ParallelMode::Disabled, || a.multiply(&b).unwrap());
        let par = with_parallel_mode(ParallelMode::Enabled, || a.multiply(&b).unwrap());
        assert_eq!(seq.shape(), (40, 50));
        assert_eq!(seq, par);
    }

    #[test]
    fn test_zip_all() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let b = Matrix::from([[10, 20], [30, 40]]);
        let c = Matrix::from([[100, 200], [300, 400]]);

        let sum = zip_all(&[&a, &b, &c], |x, y| x + y).unwrap();
        assert_eq!(sum, Matrix::from([[111, 222], [333, 444]]));

        assert_eq!(zip_all(&[&a], |x, y| x + y).unwrap(), a);
        assert_eq!(
            zip_all::<i32, _>(&[], |x, y| x + y),
            Err(MatrixError::EmptyInput)
        );

        let odd = Matrix::from([[1]]);
        assert!(zip_all(&[&a, &odd], |x, y| x + y).is_err());
    }

    #[test]
    fn test_zip_all_with() {
        let a = Matrix::from([[1, 5], [3, 4]]);
        let b = Matrix::from([[2, 2], [9, 1]]);
        let c = Matrix::from([[0, 7], [3, 3]]);
        let max = zip_all_with(&[&a, &b, &c], |cells| cells.iter().copied().max().unwrap_or(0))
            .unwrap();
        assert_eq!(max, Matrix::from([[2, 7], [9, 4]]));

        let sizes = zip_all_with(&[&a], |cells| cells.len()).unwrap();
        assert_eq!(sizes, Matrix::from([[1usize, 1], [1, 1]]));
    }

    #[test]
    fn test_is_same_shape_all() {
        let a = Matrix::from([[1, 2]]);
        let b = Matrix::from([[3, 4]]);
        let c = Matrix::from([[1], [2]]);
        assert!(is_same_shape_all(&[&a, &b]));
        assert!(!is_same_shape_all(&[&a, &b, &c]));
        assert!(is_same_shape_all::<i32>(&[]));
    }
}
