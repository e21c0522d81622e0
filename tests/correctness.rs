use approx::assert_relative_eq;
use dense_grid::{
    set_parallel_mode, with_parallel_mode, zip_all, FaultKind, Matrix, MatrixError, ParallelMode,
    Point, MIN_COUNT_FOR_PARALLEL,
};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}

fn make_matrix(rows: usize, cols: usize) -> Matrix<f64> {
    let data = (0..rows * cols).map(|k| k as f64 * 0.5).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

#[test]
fn test_transpose_square() {
    let m = Matrix::from([[1, 2], [3, 4]]);
    assert_eq!(m.transpose(), Matrix::from([[1, 3], [2, 4]]));
}

#[test]
fn test_rotate90_rectangular() {
    let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
    assert_eq!(m.rotate90(), Matrix::from([[4, 1], [5, 2], [6, 3]]));
}

#[test]
fn test_reshape_same_count() {
    let m = Matrix::from([[1, 2], [3, 4], [5, 6]]);
    assert_eq!(m.reshape(2, 3).unwrap(), Matrix::from([[1, 2, 3], [4, 5, 6]]));
}

#[test]
fn test_diagonal_lu2rd_factory() {
    assert_eq!(
        Matrix::diagonal_lu2rd(&[1, 2, 3]).unwrap(),
        Matrix::from([[1, 0, 0], [0, 2, 0], [0, 0, 3]])
    );
}

#[test]
fn test_add_and_multiply() {
    let a = Matrix::from([[1, 2], [3, 4]]);
    let b = Matrix::from([[10, 20], [30, 40]]);
    assert_eq!(a.add(&b).unwrap(), Matrix::from([[11, 22], [33, 44]]));
    assert_eq!(a.multiply(&b).unwrap(), Matrix::from([[70, 100], [150, 220]]));
}

#[test]
fn test_extend_with_fill() {
    let m = Matrix::from([[1, 2], [3, 4]]);
    assert_eq!(
        m.extend_with(3, 3, 9).unwrap(),
        Matrix::from([[1, 2, 9], [3, 4, 9], [9, 9, 9]])
    );
}

#[test]
fn test_float_multiply() {
    let a = make_matrix(3, 4);
    let b = make_matrix(4, 2);
    let c = a.multiply(&b).unwrap();
    assert_eq!(c.shape(), (3, 2));
    for i in 0..3 {
        for j in 0..2 {
            let expected: f64 = (0..4).map(|k| a[(i, k)] * b[(k, j)]).sum();
            assert_relative_eq!(c[(i, j)], expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_float_subtract_and_map() {
    let a = make_matrix(5, 5);
    let b = a.map(|x| x * 0.25);
    let d = a.subtract(&b).unwrap();
    for (x, y) in d.iter().zip(a.iter()) {
        assert_relative_eq!(*x, y * 0.75, epsilon = 1e-12);
    }
}

#[test]
fn test_complex_elements() {
    let a = Matrix::from([
        [Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)],
        [Complex64::new(3.0, 0.0), Complex64::new(1.0, -1.0)],
    ]);
    let id = Matrix::diagonal_lu2rd(&[Complex64::new(1.0, 0.0); 2]).unwrap();
    assert_eq!(a.multiply(&id).unwrap(), a);

    let sq = a.multiply(&a).unwrap();
    // (1+i)(1+i) + (2i)(3) = 2i + 6i
    assert_relative_eq!(sq[(0, 0)].re, 0.0, epsilon = 1e-12);
    assert_relative_eq!(sq[(0, 0)].im, 8.0, epsilon = 1e-12);
}

#[test]
fn test_shape_mismatch_faults() {
    let a = Matrix::from([[1, 2, 3]]);
    let b = Matrix::from([[1, 2], [3, 4]]);
    for err in [
        a.add(&b).unwrap_err(),
        a.subtract(&b).unwrap_err(),
        a.zip_with(&b, |x, y| x * y).unwrap_err(),
    ] {
        assert_eq!(err.kind(), FaultKind::Argument);
        assert!(matches!(err, MatrixError::ShapeMismatch { .. }));
    }
    assert!(matches!(
        a.multiply(&b),
        Err(MatrixError::InnerDimensionMismatch {
            lhs_cols: 3,
            rhs_rows: 2
        })
    ));
    assert!(b.multiply(&a.transpose().copy_rows(0..2).unwrap()).is_ok());
}

#[test]
fn test_failed_calls_leave_matrix_unchanged() {
    let mut m = Matrix::from([[1, 2], [3, 4], [5, 6]]);
    let before = m.clone();
    assert_eq!(m.set_lu2rd(&[9, 9, 9]).unwrap_err().kind(), FaultKind::State);
    assert!(m.set_row(0, &[1]).is_err());
    assert!(m.fill_from_at(5, 0, &Matrix::from([[0]])).is_err());
    assert_eq!(m, before);
}

#[test]
fn test_map_deterministic_around_threshold() {
    let mut rng = StdRng::seed_from_u64(42);
    let _guard = init_test_subscriber();
    for &len in &[MIN_COUNT_FOR_PARALLEL - 1, MIN_COUNT_FOR_PARALLEL + 1, 3 * MIN_COUNT_FOR_PARALLEL] {
        let m = Matrix::<u32>::random_with(&mut rng, len).reshape_cols(97).unwrap();
        let f = |x: &u32| x.wrapping_mul(2_654_435_761) ^ 0x5bd1e995;
        let seq = with_parallel_mode(ParallelMode::Disabled, || m.map(f));
        let par = with_parallel_mode(ParallelMode::Enabled, || m.map(f));
        let auto = with_parallel_mode(ParallelMode::Auto, || m.map(f));
        assert_eq!(seq, par);
        assert_eq!(seq, auto);
    }
}

#[test]
fn test_parallel_mode_set_and_restore() {
    let prev = set_parallel_mode(ParallelMode::Enabled);
    let a = Matrix::from_vec(64, 64, (0..4096i64).collect()).unwrap();
    let par = zip_all(&[&a, &a, &a], |x, y| x + y).unwrap();
    set_parallel_mode(ParallelMode::Disabled);
    let seq = zip_all(&[&a, &a, &a], |x, y| x + y).unwrap();
    set_parallel_mode(prev);
    assert_eq!(par, seq);
    assert_eq!(par, a.map(|x| x * 3));
}

#[test]
fn test_neighbour_walk() {
    // Sum of each cell's in-grid orthogonal neighbours.
    let m = Matrix::from([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    let sums = Matrix::from_vec(
        3,
        3,
        m.points_h()
            .map(|p| {
                m.adjacent4_points(p.row, p.col)
                    .into_iter()
                    .flatten()
                    .map(|q| m[q])
                    .sum::<i32>()
            })
            .collect(),
    )
    .unwrap();
    assert_eq!(sums, Matrix::from([[6, 9, 8], [13, 20, 17], [12, 21, 14]]));
    assert_eq!(m[Point::of(1, 1)], 5);
}

#[test]
fn test_wrap_moves_storage() {
    let data = vec![String::from("a"), String::from("b")];
    let ptr = data.as_ptr();
    let m = Matrix::from_vec(1, 2, data).unwrap();
    assert_eq!(m.as_slice().as_ptr(), ptr);
    let back = m.into_vec();
    assert_eq!(back.as_ptr(), ptr);
}

#[test]
fn test_display_and_convert() {
    let m: Matrix<i64> = Matrix::from([[1i32, -2], [3, 4]]).convert();
    assert_eq!(m.to_string(), "[[1, -2], [3, 4]]");
    let v = m.stream_v().copied().collect::<Vec<_>>();
    assert_eq!(v, vec![1, 3, -2, 4]);
}
