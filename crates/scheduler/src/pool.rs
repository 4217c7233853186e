// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-size worker thread pool.
//!
//! Workers are created once when the pool is built and reused across
//! every kernel dispatch — no per-call thread creation or teardown.
//! Each worker owns a job channel; the pool is drained and joined on
//! drop.

use crate::ScheduleError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::JoinHandle;

/// A unit of work handed to one worker.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    sender: Option<mpsc::Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

/// A fixed set of named worker threads fed by per-worker channels.
pub(crate) struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawns `num_workers` threads named `{prefix}-{index}`.
    pub(crate) fn new(num_workers: usize, prefix: &str) -> Self {
        let workers = (0..num_workers)
            .map(|i| {
                let (sender, receiver) = mpsc::channel::<Job>();
                let name = format!("{prefix}-{i}");
                let handle = std::thread::Builder::new()
                    .name(name.clone())
                    .spawn(move || worker_loop(receiver))
                    .unwrap_or_else(|e| panic!("failed to spawn worker '{name}': {e}"));
                Worker {
                    sender: Some(sender),
                    handle: Some(handle),
                }
            })
            .collect();
        tracing::debug!("worker pool started with {num_workers} worker(s)");
        Self { workers }
    }

    /// Returns the number of pool workers (the dispatching thread is
    /// not counted).
    pub(crate) fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Hands `job` to worker `index`.
    pub(crate) fn execute(&self, index: usize, job: Job) -> Result<(), ScheduleError> {
        let sender = self.workers[index]
            .sender
            .as_ref()
            .ok_or(ScheduleError::PoolShutDown)?;
        sender.send(job).map_err(|_| ScheduleError::PoolShutDown)
    }
}

/// Receives jobs until the pool drops the sending half.
///
/// A panicking job is contained so the worker stays usable; the
/// dispatcher observes the lost result through its join barrier.
fn worker_loop(receiver: mpsc::Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(
                "worker '{}' caught a kernel panic",
                std::thread::current().name().unwrap_or("?"),
            );
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channels lets each worker drain and exit.
        for worker in &mut self.workers {
            worker.sender.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
        tracing::debug!("worker pool drained and joined");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_executes_jobs() {
        let pool = WorkerPool::new(2, "test-worker");
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        for i in 0..4 {
            let counter = Arc::clone(&counter);
            let tx = tx.clone();
            pool.execute(
                i % 2,
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tx.send(()).unwrap();
                }),
            )
            .unwrap();
        }
        for _ in 0..4 {
            rx.recv().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_worker_survives_panicking_job() {
        let pool = WorkerPool::new(1, "test-worker");
        let (tx, rx) = mpsc::channel();

        pool.execute(0, Box::new(|| panic!("deliberate test panic")))
            .unwrap();
        // The same worker must still accept and run jobs.
        pool.execute(
            0,
            Box::new(move || {
                tx.send(42).unwrap();
            }),
        )
        .unwrap();
        assert_eq!(rx.recv().unwrap(), 42);
    }

    #[test]
    fn test_drop_joins_workers() {
        let pool = WorkerPool::new(3, "test-worker");
        assert_eq!(pool.num_workers(), 3);
        drop(pool); // must not hang
    }
}
