// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The capability interface every operator kernel implements.

use crate::{KernelError, ThreadContext, Window};
use tensor_core::BorderSize;

/// How the halo of elements surrounding legitimate data is treated when
/// a kernel's access pattern reads neighbouring elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BorderMode {
    /// The iteration window is shrunk so the kernel never reads outside
    /// the tensor's logical bounds; border output elements are simply
    /// not produced.
    Undefined,
    /// The halo is materialized and filled with a fixed value.
    Constant,
    /// The halo is filled by copying the nearest in-bounds edge value
    /// outward.
    Replicate,
}

/// The contract between an operator kernel and the scheduler.
///
/// A value implementing `Kernel` is fully configured: its state was
/// validated and snapshotted at construction and is read-only during
/// `run()`. `run()` must be safe to invoke concurrently from multiple
/// threads against the same kernel given disjoint windows; any scratch
/// space must be local to the invocation.
pub trait Kernel: Send + Sync {
    /// Operation name, as listed in the kernel registry.
    fn name(&self) -> &'static str;

    /// The full execution window computed at configure time.
    fn window(&self) -> &Window;

    /// The halo this kernel's access footprint requires, derived
    /// statically (e.g. the filter radius). Zero for element-wise
    /// kernels.
    fn border_size(&self) -> BorderSize {
        BorderSize::ZERO
    }

    /// Whether the window may be partitioned across workers. Kernels
    /// with sequential dependencies (running sums, stateful scans)
    /// return `false` and are executed on a single worker.
    fn is_parallelisable(&self) -> bool {
        true
    }

    /// Minimum number of iterations along the split dimension for a
    /// partition to be worth dispatching. The scheduler will not create
    /// chunks smaller than this.
    fn min_workload(&self) -> i64 {
        1
    }

    /// Executes the kernel over `window`, one partition of
    /// [`Kernel::window`].
    ///
    /// # Errors
    /// Run-time errors are not expected in steady state — `validate()`
    /// plus `configure()` establish all preconditions. A violated
    /// invariant (e.g. a malformed partition) is fatal.
    fn run(&self, window: &Window, ctx: &ThreadContext) -> Result<(), KernelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    /// A minimal kernel exercising the trait's defaults.
    struct NoopKernel {
        window: Window,
    }

    impl Kernel for NoopKernel {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn window(&self) -> &Window {
            &self.window
        }

        fn run(&self, _window: &Window, _ctx: &ThreadContext) -> Result<(), KernelError> {
            Ok(())
        }
    }

    #[test]
    fn test_defaults() {
        let k = NoopKernel {
            window: Window::from_shape(&Shape::matrix(2, 2)),
        };
        assert_eq!(k.border_size(), BorderSize::ZERO);
        assert!(k.is_parallelisable());
        assert_eq!(k.min_workload(), 1);
        assert!(k.run(k.window(), &ThreadContext::single()).is_ok());
    }
}
