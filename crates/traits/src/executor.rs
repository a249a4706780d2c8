//! Executor trait for running independent document jobs.
//!
//! The batch runner hands every recipient's job to an executor; whether the
//! jobs run one after another or on a thread pool is the executor's business.

use std::fmt::Debug;

/// Runs a batch of independent work items.
///
/// Implementations must return results in the same order as the input
/// items, regardless of the order in which the work actually ran.
pub trait Executor: Send + Sync + Debug {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Upper bound on the number of items processed at the same time.
    fn parallelism(&self) -> usize;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Processes items one after another on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}
