use crate::error::{Result, SarError};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Fixed-size worker pool; `workers == 0` sizes it to the machine.
pub fn worker_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sar-worker-{i}"))
        .build()
        .map_err(|e| SarError::Argument(format!("worker pool: {e}")))
}

/// Partition count to plan for.
pub fn effective_workers(pool: &ThreadPool) -> usize {
    pool.current_num_threads().max(1)
}
