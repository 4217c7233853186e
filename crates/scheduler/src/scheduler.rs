// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Window partitioning and parallel dispatch.

use crate::pool::WorkerPool;
use crate::{ScheduleError, SchedulerConfig};
use kernel_core::{Kernel, KernelError, ThreadContext, Window, WindowError};
use std::sync::mpsc;
use std::sync::Arc;

/// Turns a full [`Window`] plus a [`Kernel`] into a set of parallel
/// executions with join semantics.
///
/// The calling thread always runs chunk 0 itself, so a scheduler with
/// `num_threads` dispatches at most `num_threads - 1` jobs to the pool.
///
/// # Example
/// ```no_run
/// use scheduler::{Scheduler, SchedulerConfig};
/// # fn example(kernel: std::sync::Arc<dyn kernel_core::Kernel>) -> Result<(), scheduler::ScheduleError> {
/// let scheduler = Scheduler::new(&SchedulerConfig::with_threads(4));
/// scheduler.schedule(&kernel)?;
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    pool: WorkerPool,
    num_threads: usize,
}

impl Scheduler {
    /// Creates a scheduler and spawns its worker pool.
    pub fn new(config: &SchedulerConfig) -> Self {
        let num_threads = config.resolve_threads();
        let pool = WorkerPool::new(num_threads - 1, &config.worker_name_prefix);
        tracing::info!("scheduler created with {num_threads} thread(s)");
        Self { pool, num_threads }
    }

    /// Returns the configured thread count (calling thread included).
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Dispatches `kernel` over its configured window, splitting along
    /// the outermost dimension with more than one iteration.
    pub fn schedule(&self, kernel: &Arc<dyn Kernel>) -> Result<(), ScheduleError> {
        let dim = default_split_dimension(kernel.window());
        self.schedule_split(kernel, dim)
    }

    /// Dispatches each kernel in order, with the join barrier between
    /// stages establishing a happens-before relationship: stage N's
    /// writes (e.g. a materialized halo) are visible before stage N+1
    /// begins.
    pub fn schedule_sequence(&self, kernels: &[Arc<dyn Kernel>]) -> Result<(), ScheduleError> {
        for kernel in kernels {
            self.schedule(kernel)?;
        }
        Ok(())
    }

    /// Dispatches `kernel`, splitting along `split_dim`.
    ///
    /// Runs single-threaded when the kernel is not parallelisable, the
    /// pool has one thread, or the split dimension cannot sustain more
    /// than one chunk of at least `min_workload()` iterations.
    pub fn schedule_split(
        &self,
        kernel: &Arc<dyn Kernel>,
        split_dim: usize,
    ) -> Result<(), ScheduleError> {
        let window = kernel.window().clone();
        let rank = window.rank();
        if rank == 0 || window.total_iterations() == 0 {
            tracing::debug!(kernel = kernel.name(), "empty window, nothing to run");
            return Ok(());
        }
        if split_dim >= rank {
            return Err(ScheduleError::Window(WindowError::DimensionOutOfRange {
                index: split_dim,
                rank,
            }));
        }

        let iterations = window.num_iterations(split_dim);
        let min_workload = kernel.min_workload().max(1);
        let max_chunks = (iterations / min_workload).max(1);
        let chunks = (self.num_threads as i64).min(iterations).min(max_chunks);

        if !kernel.is_parallelisable() || chunks <= 1 {
            tracing::debug!(kernel = kernel.name(), "single-threaded dispatch");
            return kernel
                .run(&window, &ThreadContext::single())
                .map_err(|e| ScheduleError::KernelFailed {
                    kernel: kernel.name(),
                    failures: 1,
                    chunks: 1,
                    first: e,
                });
        }

        let parts = window.split(split_dim, chunks as usize)?;
        let n = parts.len();
        tracing::debug!(
            kernel = kernel.name(),
            chunks = n,
            dim = split_dim,
            "parallel dispatch"
        );

        // Chunks 1..n go to pool workers; with n <= num_threads each
        // worker receives at most one job per dispatch.
        let (tx, rx) = mpsc::channel::<(usize, Result<(), KernelError>)>();
        let workers = self.pool.num_workers();
        for (i, part) in parts.iter().enumerate().skip(1) {
            let kernel = Arc::clone(kernel);
            let part = part.clone();
            let tx = tx.clone();
            let ctx = ThreadContext::new(i, n);
            self.pool.execute(
                (i - 1) % workers,
                Box::new(move || {
                    let result = kernel.run(&part, &ctx);
                    let _ = tx.send((i, result));
                }),
            )?;
        }
        drop(tx);

        // The calling thread runs chunk 0, then blocks at the join
        // barrier until every worker has reported.
        let mut results: Vec<(usize, Result<(), KernelError>)> = Vec::with_capacity(n);
        results.push((0, kernel.run(&parts[0], &ThreadContext::new(0, n))));
        while results.len() < n {
            match rx.recv() {
                Ok(entry) => results.push(entry),
                Err(_) => {
                    // A sender was dropped without reporting: the job
                    // panicked inside a worker.
                    return Err(ScheduleError::WorkerPanicked {
                        kernel: kernel.name(),
                        lost: n - results.len(),
                    });
                }
            }
        }

        // Aggregate: exactly one error surfaces, from the
        // lowest-numbered failing partition.
        results.sort_by_key(|&(i, _)| i);
        let failures = results.iter().filter(|(_, r)| r.is_err()).count();
        if failures > 0 {
            let first = results
                .into_iter()
                .find_map(|(_, r)| r.err())
                .expect("failure count > 0");
            return Err(ScheduleError::KernelFailed {
                kernel: kernel.name(),
                failures,
                chunks: n,
                first,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

/// The outermost dimension with more than one iteration, falling back
/// to dimension 0.
fn default_split_dimension(window: &Window) -> usize {
    (0..window.rank())
        .find(|&d| window.num_iterations(d) > 1)
        .unwrap_or(0)
}
