// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-dispatch thread identity.

/// Identifies one partition of a parallel kernel dispatch.
///
/// Created by the scheduler for each dispatched partition and dropped
/// when that partition's `run()` returns; never shared or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadContext {
    /// Index of this partition, in `0..num_threads`.
    pub thread_id: usize,
    /// Total number of partitions in this dispatch.
    pub num_threads: usize,
}

impl ThreadContext {
    /// Creates a context for partition `thread_id` of `num_threads`.
    pub fn new(thread_id: usize, num_threads: usize) -> Self {
        debug_assert!(thread_id < num_threads.max(1));
        Self {
            thread_id,
            num_threads,
        }
    }

    /// The context for an undivided, single-threaded dispatch.
    pub fn single() -> Self {
        Self {
            thread_id: 0,
            num_threads: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        let ctx = ThreadContext::single();
        assert_eq!(ctx.thread_id, 0);
        assert_eq!(ctx.num_threads, 1);
    }

    #[test]
    fn test_new() {
        let ctx = ThreadContext::new(2, 4);
        assert_eq!(ctx.thread_id, 2);
        assert_eq!(ctx.num_threads, 4);
    }
}
