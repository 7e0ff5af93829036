//! Parallel processing utilities for extraction and grid population
//!
//! Work is split into slabs (one lattice coordinate along the outermost
//! axis) and handed to rayon. Results are always collected in slab order, so
//! parallel output is identical to the sequential output.

use isomesh_core::{Error, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::{Arc, OnceLock};

/// Optional dedicated pool; rayon's global pool is used until one is set
static GLOBAL_THREAD_POOL: OnceLock<Arc<ThreadPool>> = OnceLock::new();

/// Settings for the dedicated thread pool, read only by [`init_thread_pool`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadPoolConfig {
    /// Number of worker threads (None = rayon default)
    pub num_threads: Option<usize>,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "isomesh-worker".to_string(),
        }
    }
}

impl ThreadPoolConfig {
    /// Set number of threads
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the thread name prefix
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

/// Per-job parallel processing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Enable parallel processing (off by default: extraction is a
    /// single-threaded batch job unless the host opts in)
    pub enabled: bool,
    /// Grids with fewer cells than this run sequentially
    pub min_cells: usize,
    /// Target number of rayon tasks per worker thread
    pub tasks_per_thread: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_cells: 32 * 32 * 32,
            tasks_per_thread: 4,
        }
    }
}

impl ParallelConfig {
    /// Enabled configuration with default thresholds
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Enable or disable parallel processing
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the sequential fallback threshold
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Whether a job over `cells` cells should be parallelised
    pub fn should_parallelize(&self, cells: usize) -> bool {
        self.enabled && cells >= self.min_cells
    }
}

/// Initialize the dedicated thread pool that parallel jobs run on.
///
/// Until this is called, parallel jobs use rayon's global pool. Only the
/// first call takes effect; later calls are no-ops.
pub fn init_thread_pool(config: &ThreadPoolConfig) -> Result<()> {
    if GLOBAL_THREAD_POOL.get().is_some() {
        return Ok(());
    }

    let mut builder = ThreadPoolBuilder::new();

    if let Some(num_threads) = config.num_threads {
        builder = builder.num_threads(num_threads);
    }

    if !config.thread_name_prefix.is_empty() {
        let prefix = config.thread_name_prefix.clone();
        builder = builder.thread_name(move |index| format!("{}-{}", prefix, index));
    }

    let pool = builder
        .build()
        .map_err(|e| Error::Algorithm(format!("Failed to create thread pool: {}", e)))?;

    log::debug!(
        "initialised extraction thread pool with {} threads",
        pool.current_num_threads()
    );

    // Another caller may have initialised it meanwhile
    let _ = GLOBAL_THREAD_POOL.set(Arc::new(pool));
    Ok(())
}

/// Number of threads the next parallel job will use
pub fn current_num_threads() -> usize {
    match GLOBAL_THREAD_POOL.get() {
        Some(pool) => pool.current_num_threads(),
        None => rayon::current_num_threads(),
    }
}

/// Run `op` inside the dedicated pool if one was initialised
pub fn execute_parallel<F, R>(op: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match GLOBAL_THREAD_POOL.get() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Minimum number of consecutive slabs per rayon task
pub fn compute_min_slabs_per_task(slab_count: usize, config: &ParallelConfig) -> usize {
    let tasks = current_num_threads() * config.tasks_per_thread.max(1);
    (slab_count / tasks.max(1)).max(1)
}

/// Map every slab in `slabs` through `f`, returning results in slab order.
///
/// Runs sequentially when `parallel` is false.
pub fn map_slabs_ordered<U, F>(
    slabs: Range<usize>,
    parallel: bool,
    config: &ParallelConfig,
    f: F,
) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    if !parallel {
        return slabs.map(f).collect();
    }

    let min_len = compute_min_slabs_per_task(slabs.len(), config);
    execute_parallel(|| slabs.into_par_iter().with_min_len(min_len).map(f).collect())
}

/// Fill `values` one slab of `slab_len` elements at a time.
///
/// `fill` receives the slab index and its disjoint mutable window.
pub fn fill_slabs<F>(values: &mut [f32], slab_len: usize, parallel: bool, fill: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    if slab_len == 0 {
        return;
    }

    if !parallel {
        values
            .chunks_mut(slab_len)
            .enumerate()
            .for_each(|(slab, window)| fill(slab, window));
        return;
    }

    execute_parallel(|| {
        values
            .par_chunks_mut(slab_len)
            .enumerate()
            .for_each(|(slab, window)| fill(slab, window))
    });
}
