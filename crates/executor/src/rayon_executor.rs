//! Rayon-backed executor with its own bounded thread pool.

use offerdoc_traits::Executor;
use rayon::prelude::*;
use std::sync::Arc;

/// Runs jobs on a dedicated rayon pool, so the number of documents built at
/// once never exceeds the configured thread count.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Arc<rayon::ThreadPool>,
    num_threads: usize,
}

impl RayonExecutor {
    pub fn with_threads(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let num_threads = num_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("offerdoc-worker-{}", i))
            .build()?;
        Ok(Self {
            pool: Arc::new(pool),
            num_threads,
        })
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        // Indexed parallel iterators collect in input order.
        self.pool.install(|| items.into_par_iter().map(f).collect())
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
