// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Process-wide scheduler instance.
//!
//! Operators that do not thread a [`Scheduler`] handle through their
//! API can share one via [`init`] / [`get`]. Initialization is
//! explicit and happens exactly once; [`shutdown`] drains and joins
//! the pool when the last handle is dropped.

use crate::{ScheduleError, Scheduler, SchedulerConfig};
use std::sync::{Arc, Mutex};

static GLOBAL: Mutex<Option<Arc<Scheduler>>> = Mutex::new(None);

/// Creates the process-wide scheduler from `config`.
///
/// Fails with [`ScheduleError::AlreadyInitialized`] on a second call;
/// re-initialization requires an intervening [`shutdown`].
pub fn init(config: &SchedulerConfig) -> Result<(), ScheduleError> {
    let mut slot = lock();
    if slot.is_some() {
        return Err(ScheduleError::AlreadyInitialized);
    }
    *slot = Some(Arc::new(Scheduler::new(config)));
    Ok(())
}

/// Returns a handle to the process-wide scheduler.
pub fn get() -> Result<Arc<Scheduler>, ScheduleError> {
    lock().clone().ok_or(ScheduleError::NotInitialized)
}

/// True once [`init`] has run and [`shutdown`] has not.
pub fn is_initialized() -> bool {
    lock().is_some()
}

/// Releases the process-wide scheduler.
///
/// The worker pool drains in-flight jobs and joins once the last
/// outstanding [`get`] handle is dropped.
pub fn shutdown() {
    if lock().take().is_some() {
        tracing::info!("global scheduler shut down");
    }
}

fn lock() -> std::sync::MutexGuard<'static, Option<Arc<Scheduler>>> {
    // A poisoned lock here means a panic while swapping the slot,
    // which leaves the Option itself intact.
    match GLOBAL.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The slot is process-wide state, so the whole lifecycle lives in
    // one test to keep it independent of test ordering.
    #[test]
    fn test_lifecycle() {
        shutdown();
        assert!(!is_initialized());
        assert!(matches!(get(), Err(ScheduleError::NotInitialized)));

        init(&SchedulerConfig::with_threads(2)).unwrap();
        assert!(is_initialized());
        assert_eq!(get().unwrap().num_threads(), 2);
        assert!(matches!(
            init(&SchedulerConfig::with_threads(4)),
            Err(ScheduleError::AlreadyInitialized)
        ));

        shutdown();
        assert!(!is_initialized());
        assert!(matches!(get(), Err(ScheduleError::NotInitialized)));
    }
}
