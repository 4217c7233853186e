// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for kernel dispatch.

use kernel_core::{KernelError, WindowError};

/// Errors surfaced by [`crate::Scheduler`] and the global instance.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// One or more partitions of a dispatch failed. All partitions ran
    /// to completion; `first` is the failure from the lowest-numbered
    /// partition. Output written by the failed dispatch is undefined
    /// and must not be consumed.
    #[error("kernel '{kernel}' failed in {failures} of {chunks} partitions: {first}")]
    KernelFailed {
        kernel: &'static str,
        failures: usize,
        chunks: usize,
        #[source]
        first: KernelError,
    },

    /// A worker thread panicked while running a partition.
    #[error("worker panicked while running kernel '{kernel}' ({lost} partition(s) lost)")]
    WorkerPanicked { kernel: &'static str, lost: usize },

    /// The kernel's window could not be partitioned as requested.
    #[error("window partitioning failed: {0}")]
    Window(#[from] WindowError),

    /// A job could not be handed to a worker because its thread has
    /// terminated.
    #[error("worker pool is shut down")]
    PoolShutDown,

    /// The global scheduler was initialized twice.
    #[error("global scheduler already initialized")]
    AlreadyInitialized,

    /// The global scheduler was used before initialization.
    #[error("global scheduler not initialized; call global::init first")]
    NotInitialized,

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
