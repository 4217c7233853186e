// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Quantized CPU kernels built on the kernel contract.
//!
//! Two operator kernels plus the fixed-point arithmetic they share:
//!
//! ```text
//!   fixedpoint   -- Q0.31 multiply / rounding shift / scale encoding
//!   rescale      -- i32 accumulators -> asymmetric u8 (offset
//!                   contribution + output stage, fused)
//!   fill_border  -- halo materialization for neighbour readers
//!   registry     -- descriptor-level validation for graph builders
//! ```
//!
//! Kernels here never touch threads themselves; they describe an
//! iteration domain via [`kernel_core::Window`] and process whatever
//! partition the scheduler hands them. Determinism follows: every
//! element is computed by exactly one thread, from inputs frozen at
//! dispatch.

pub mod fill_border;
pub mod fixedpoint;
pub mod registry;
pub mod rescale;

pub use fill_border::FillBorderKernel;
pub use registry::{kernel_names, validate_operator, OperatorSpec};
pub use rescale::{QuantizedRescaleKernel, RescaleConfig, RescaleParams};
