// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # kernel-core
//!
//! The execution contract shared by every operator kernel:
//!
//! - [`Window`] — the n-dimensional iteration domain a kernel must visit,
//!   sliceable into disjoint sub-domains for parallel dispatch.
//! - [`ThreadContext`] — per-partition thread identity passed into `run()`.
//! - [`Kernel`] — the capability interface (`name` / `window` /
//!   `border_size` / `is_parallelisable` / `run`) the scheduler drives.
//! - [`BorderMode`] — how the halo around legitimate data is treated.
//!
//! # Configure-by-Construction
//! There is no "unconfigured kernel" state: a concrete kernel's
//! `configure(...)` constructor validates its inputs and returns
//! `Result<Self, ValidateError>`, so any value implementing [`Kernel`]
//! is ready to run. Each concrete kernel additionally exposes a pure
//! `validate(...)` associated function for cheaply probing candidate
//! configurations without side effects.

mod context;
mod error;
mod kernel;
mod window;

pub use context::ThreadContext;
pub use error::{KernelError, ValidateError, WindowError};
pub use kernel::{BorderMode, Kernel};
pub use window::{Dimension, Window};
