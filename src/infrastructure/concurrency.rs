/// Thread pool setup for batch runs.
use anyhow::Result;
use tracing::debug;

/// Worker count: the requested number, or one per core. Never zero.
pub fn worker_count(jobs: Option<usize>) -> usize {
    jobs.unwrap_or_else(num_cpus::get).max(1)
}

/// Initialize the global rayon thread pool. Returns the number of workers.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = worker_count(jobs);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    debug!(workers, cores, "initialized thread pool");

    Ok(workers)
}
