// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # scheduler
//!
//! Partitions a kernel's [`kernel_core::Window`] across a fixed pool of
//! worker threads and dispatches `run()` per partition.
//!
//! ```text
//! Scheduler::schedule(kernel)
//!     │  is_parallelisable()? threads? extent?
//!     ├── no  → run(window, {0, 1}) on the calling thread
//!     └── yes → Window::split(dim, chunks)
//!                  │  chunk 0 on the calling thread,
//!                  │  chunks 1..n on pool workers
//!                  ▼
//!               join barrier → aggregated result
//! ```
//!
//! # Guarantees
//! - Partition completeness: the dispatched chunks tile the original
//!   window exactly, pairwise disjoint.
//! - No ordering between chunks of one dispatch; strict ordering between
//!   successive dispatches (the join barrier makes stage N's writes
//!   visible before stage N+1 starts).
//! - Output is bit-identical for any thread count — determinism under
//!   parallelism is the scheduler's fundamental correctness contract.
//! - On failure every dispatched chunk still runs to completion, then
//!   exactly one aggregated error is surfaced.
//!
//! # Process-Wide Instance
//! The [`global`] module holds an explicitly initialized, explicitly
//! shut down scheduler so pipelines share one pool without an implicit
//! first-use singleton.

mod config;
mod error;
pub mod global;
mod pool;
#[allow(clippy::module_inception)]
mod scheduler;

pub use config::SchedulerConfig;
pub use error::ScheduleError;
pub use scheduler::Scheduler;
