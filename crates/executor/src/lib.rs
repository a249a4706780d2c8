//! Executor implementations for offerdoc batch generation.
//!
//! - [`RayonExecutor`]: bounded thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: sequential execution (re-exported from offerdoc-traits)

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use offerdoc_traits::{Executor, SyncExecutor};

/// Concrete executor selection.
///
/// `Executor` has generic methods and cannot be a trait object, so the
/// runner holds this enum and delegates.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    Sync(SyncExecutor),
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// Parallel executor limited to `concurrency` simultaneous jobs, or the
    /// sequential one when parallelism is unavailable or pointless.
    pub fn bounded(concurrency: usize) -> Self {
        if concurrency <= 1 {
            return ExecutorImpl::Sync(SyncExecutor::new());
        }
        #[cfg(feature = "rayon")]
        {
            match RayonExecutor::with_threads(concurrency) {
                Ok(executor) => return ExecutorImpl::Rayon(executor),
                Err(e) => log::warn!("Falling back to sequential execution: {}", e),
            }
        }
        ExecutorImpl::Sync(SyncExecutor::new())
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        Self::bounded(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_of_one_is_sequential() {
        let executor = ExecutorImpl::bounded(1);
        assert!(matches!(executor, ExecutorImpl::Sync(_)));
        assert_eq!(executor.parallelism(), 1);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn bounded_executor_reports_its_limit() {
        let executor = ExecutorImpl::bounded(3);
        assert_eq!(executor.parallelism(), 3);
        assert_eq!(executor.name(), "RayonExecutor");
    }

    #[test]
    fn results_keep_input_order() {
        let executor = ExecutorImpl::default();
        let results = executor.execute_all((0..50).collect::<Vec<u32>>(), |x| x * 10);
        assert_eq!(results, (0..50).map(|x| x * 10).collect::<Vec<_>>());
    }
}
