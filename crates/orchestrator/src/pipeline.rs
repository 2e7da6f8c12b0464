use rayon::prelude::*;

/// The bounded fan-out combinator every run dispatches analyzers through:
/// a `rayon` thread pool sized to the configured `concurrency` limit, so
/// analyzers genuinely run as independent tasks over shared, read-only
/// input rather than however many threads happen to be free.
pub struct ParallelPipeline {
    pool: rayon::ThreadPool,
}

impl ParallelPipeline {
    pub fn new(concurrency: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(concurrency.max(1)).build()?;
        Ok(Self { pool })
    }

    /// Applies `f` to every item inside the bounded pool, returning results
    /// in the same order as `items`.
    pub fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        self.pool.install(|| items.into_par_iter().map(f).collect())
    }
}
