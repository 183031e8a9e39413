//! Common utilities used across the crate.
//!
//! Parallelism configuration for the per-feature split search and the
//! batch predictor.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through training and inference components.
/// When `Parallel`, components may use `rayon` parallel iterators; when
/// `Sequential`, they must iterate in order on the calling thread.
///
/// The actual thread pool is set up at the model API level via `n_threads`
/// (see [`run_with_threads`]). Components never manage pools themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over `iter`, preserving input order in the output.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }

    /// `for_each` over a plain iterator, bridged onto rayon when parallel.
    ///
    /// For iterators that don't implement `IntoParallelIterator`, such as
    /// zipped ndarray chunk iterators.
    #[inline]
    pub fn maybe_par_bridge_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge().for_each(f);
        } else {
            iter.for_each(f);
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the global rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs sequentially.
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel if n_threads == 0 => f(Parallelism::Parallel),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!(n_threads, %err, "failed to build thread pool, running sequentially");
                    f(Parallelism::Sequential)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelism_from_threads() {
        assert!(!Parallelism::from_threads(1).is_parallel());
        assert!(Parallelism::from_threads(2).is_parallel());
        assert!(Parallelism::from_threads(8).is_parallel());
    }

    #[test]
    fn test_parallelism_default_is_sequential() {
        assert_eq!(Parallelism::default(), Parallelism::Sequential);
    }

    #[test]
    fn test_run_with_threads_sequential() {
        let result = run_with_threads(1, |p| (p, 42));
        assert_eq!(result, (Parallelism::Sequential, 42));
    }

    #[test]
    fn test_run_with_threads_explicit() {
        let result = run_with_threads(2, |_| rayon::current_num_threads());
        assert_eq!(result, 2);
    }

    #[test]
    fn test_maybe_par_map_preserves_order() {
        let seq: Vec<_> = Parallelism::Sequential.maybe_par_map(0..64usize, |i| i * 2);
        let par: Vec<_> = Parallelism::Parallel.maybe_par_map(0..64usize, |i| i * 2);
        assert_eq!(seq, par);
        assert_eq!(seq[..5], [0, 2, 4, 6, 8]);
    }
}
