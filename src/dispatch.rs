//! Sequential vs parallel execution of element-wise kernels.
//!
//! Every kernel that touches the whole grid asks [`should_parallelize`] with an estimate of
//! the work it is about to do, then runs one of [`run`], [`generate`] or [`update`]. The
//! parallel paths hand out disjoint output rows (or disjoint output cells) to the rayon
//! pool, so no task ever writes a cell another task can see. Results are identical either
//! way; the switch is purely a throughput heuristic.
//!
//! The mode is per thread: a value set with [`set_parallel_mode`] only affects operations
//! started from the same thread.

use std::cell::Cell;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{check_range, MaybeSend, MaybeSendSync, Result};

/// Work estimate above which [`ParallelMode::Auto`] goes parallel.
pub const MIN_COUNT_FOR_PARALLEL: usize = 8192;

/// Per-thread override for the parallel/sequential choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParallelMode {
    /// Always use the rayon pool (when the `parallel` feature is compiled in).
    Enabled,
    /// Always run on the calling thread.
    Disabled,
    /// Parallel only when the work estimate exceeds [`MIN_COUNT_FOR_PARALLEL`].
    #[default]
    Auto,
}

thread_local! {
    static MODE: Cell<ParallelMode> = const { Cell::new(ParallelMode::Auto) };
}

/// The calling thread's current mode.
pub fn parallel_mode() -> ParallelMode {
    MODE.with(Cell::get)
}

/// Set the calling thread's mode; returns the previous one.
pub fn set_parallel_mode(mode: ParallelMode) -> ParallelMode {
    MODE.with(|m| m.replace(mode))
}

struct RestoreMode(ParallelMode);

impl Drop for RestoreMode {
    fn drop(&mut self) {
        set_parallel_mode(self.0);
    }
}

/// Run `f` with `mode` in effect on this thread, restoring the previous mode afterwards
/// (also when `f` panics).
pub fn with_parallel_mode<R>(mode: ParallelMode, f: impl FnOnce() -> R) -> R {
    let _restore = RestoreMode(set_parallel_mode(mode));
    f()
}

/// Decide whether an operation of `work` elementary steps should use the rayon pool.
///
/// Always `false` without the `parallel` feature.
pub fn should_parallelize(work: usize) -> bool {
    if !cfg!(feature = "parallel") {
        return false;
    }
    let mode = parallel_mode();
    let decision = match mode {
        ParallelMode::Enabled => true,
        ParallelMode::Disabled => false,
        ParallelMode::Auto => work > MIN_COUNT_FOR_PARALLEL && pool_threads() > 1,
    };
    tracing::trace!(work, ?mode, decision, "dispatch");
    decision
}

#[cfg(feature = "parallel")]
fn pool_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn pool_threads() -> usize {
    1
}

/// Call `f(i, j)` for every `i < rows`, `j < cols`.
///
/// Sequential execution visits cells in row-major order. Parallel execution splits the
/// longer of the two index spaces across tasks: rows when `rows <= cols`, columns
/// otherwise. No visiting order is promised in that case.
pub fn run<F>(rows: usize, cols: usize, parallel: bool, f: F)
where
    F: Fn(usize, usize) + MaybeSendSync,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            if rows <= cols {
                (0..rows).into_par_iter().for_each(|i| {
                    for j in 0..cols {
                        f(i, j);
                    }
                });
            } else {
                (0..cols).into_par_iter().for_each(|j| {
                    for i in 0..rows {
                        f(i, j);
                    }
                });
            }
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for i in 0..rows {
        for j in 0..cols {
            f(i, j);
        }
    }
}

/// [`run`] over the sub-rectangle `rows x cols` of a grid shaped `shape`.
///
/// Both ranges are validated against `shape` before anything runs.
pub fn run_range<F>(
    rows: Range<usize>,
    cols: Range<usize>,
    shape: (usize, usize),
    parallel: bool,
    f: F,
) -> Result<()>
where
    F: Fn(usize, usize) + MaybeSendSync,
{
    check_range(&rows, shape.0)?;
    check_range(&cols, shape.1)?;
    let (row0, col0) = (rows.start, cols.start);
    run(rows.len(), cols.len(), parallel, move |i, j| f(row0 + i, col0 + j));
    Ok(())
}

/// Produce a row-major `rows * cols` buffer with `f(i, j)` at position `i * cols + j`.
///
/// The caller is responsible for having validated that `rows * cols` is addressable.
pub fn generate<U, F>(rows: usize, cols: usize, parallel: bool, f: F) -> Vec<U>
where
    U: MaybeSend,
    F: Fn(usize, usize) -> U + MaybeSendSync,
{
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let len = rows * cols;

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return (0..len)
                .into_par_iter()
                .map(|k| f(k / cols, k % cols))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut out = Vec::with_capacity(len);
    for i in 0..rows {
        for j in 0..cols {
            out.push(f(i, j));
        }
    }
    out
}

/// Apply `f(i, j, &mut cell)` to every cell of a row-major buffer with `cols` columns.
///
/// Parallel execution hands each task whole rows.
pub fn update<T, F>(data: &mut [T], cols: usize, parallel: bool, f: F)
where
    T: MaybeSend,
    F: Fn(usize, usize, &mut T) + MaybeSendSync,
{
    if cols == 0 || data.is_empty() {
        return;
    }
    debug_assert_eq!(data.len() % cols, 0);

    #[cfg(feature = "parallel")]
    {
        if parallel {
            data.par_chunks_mut(cols).enumerate().for_each(|(i, row)| {
                for (j, x) in row.iter_mut().enumerate() {
                    f(i, j, x);
                }
            });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for (i, row) in data.chunks_mut(cols).enumerate() {
        for (j, x) in row.iter_mut().enumerate() {
            f(i, j, x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_default_mode_is_auto() {
        std::thread::spawn(|| assert_eq!(parallel_mode(), ParallelMode::Auto))
            .join()
            .unwrap();
    }

    #[test]
    fn test_set_mode_is_thread_local() {
        let prev = set_parallel_mode(ParallelMode::Disabled);
        std::thread::spawn(|| assert_eq!(parallel_mode(), ParallelMode::Auto))
            .join()
            .unwrap();
        assert_eq!(parallel_mode(), ParallelMode::Disabled);
        set_parallel_mode(prev);
    }

    #[test]
    fn test_with_parallel_mode_restores_on_panic() {
        let before = parallel_mode();
        let result = std::panic::catch_unwind(|| {
            with_parallel_mode(ParallelMode::Enabled, || {
                assert_eq!(parallel_mode(), ParallelMode::Enabled);
                panic!("boom");
            })
        });
        assert!(result.is_err());
        assert_eq!(parallel_mode(), before);
    }

    #[test]
    fn test_should_parallelize_modes() {
        with_parallel_mode(ParallelMode::Disabled, || {
            assert!(!should_parallelize(usize::MAX));
        });
        with_parallel_mode(ParallelMode::Auto, || {
            assert!(!should_parallelize(MIN_COUNT_FOR_PARALLEL));
        });
        #[cfg(feature = "parallel")]
        with_parallel_mode(ParallelMode::Enabled, || {
            assert!(should_parallelize(1));
        });
        #[cfg(not(feature = "parallel"))]
        with_parallel_mode(ParallelMode::Enabled, || {
            assert!(!should_parallelize(1));
        });
    }

    #[test]
    fn test_run_sequential_order() {
        let seen = Mutex::new(Vec::new());
        run(2, 3, false, |i, j| seen.lock().unwrap().push((i, j)));
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_run_parallel_visits_every_cell_once() {
        for &(rows, cols) in &[(3usize, 50usize), (50, 3), (0, 4), (7, 7)] {
            let hits: Vec<AtomicUsize> = (0..rows * cols).map(|_| AtomicUsize::new(0)).collect();
            run(rows, cols, true, |i, j| {
                hits[i * cols + j].fetch_add(1, Ordering::Relaxed);
            });
            assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
        }
    }

    #[test]
    fn test_run_range() {
        let sum = AtomicUsize::new(0);
        run_range(1..3, 2..4, (4, 4), false, |i, j| {
            sum.fetch_add(i * 10 + j, Ordering::Relaxed);
        })
        .unwrap();
        // (1,2) (1,3) (2,2) (2,3)
        assert_eq!(sum.load(Ordering::Relaxed), 12 + 13 + 22 + 23);

        assert!(run_range(0..5, 0..1, (4, 4), false, |_, _| {}).is_err());
    }

    #[test]
    fn test_generate_parallel_matches_sequential() {
        let f = |i: usize, j: usize| i * 1000 + j;
        let seq = generate(37, 251, false, f);
        let par = generate(37, 251, true, f);
        assert_eq!(seq.len(), 37 * 251);
        assert_eq!(seq, par);
        assert_eq!(seq[251], 1000);
        assert!(generate(0, 5, true, f).is_empty());
    }

    #[test]
    fn test_update_rows() {
        let mut seq = vec![0usize; 12];
        let mut par = vec![0usize; 12];
        update(&mut seq, 4, false, |i, j, x| *x = i * 4 + j);
        update(&mut par, 4, true, |i, j, x| *x = i * 4 + j);
        assert_eq!(seq, (0..12).collect::<Vec<_>>());
        assert_eq!(seq, par);

        let mut empty: Vec<usize> = Vec::new();
        update(&mut empty, 0, true, |_, _, _| unreachable!());
    }
}
