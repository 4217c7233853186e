// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the kernel contract.
//!
//! Two tiers, mirroring the substrate's error model:
//!
//! - [`ValidateError`] — recoverable, structured results from a
//!   kernel's pure `validate()`; callers probe many candidate
//!   configurations cheaply. `configure()` returns the same type and a
//!   failure there aborts configuration (programmer/integration error).
//! - [`KernelError`] — fatal run-time invariant violations. The design
//!   favours crash-on-invariant-violation over silently producing wrong
//!   numeric results.

use tensor_core::{DType, TensorError};

/// Errors constructing or manipulating a [`crate::Window`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    /// A dimension violates `end >= start`, `step > 0`.
    #[error("invalid dimension: start {start}, end {end}, step {step}")]
    InvalidDimension { start: i64, end: i64, step: i64 },

    /// A dimension index exceeds the window's rank.
    #[error("dimension index {index} out of range for rank {rank}")]
    DimensionOutOfRange { index: usize, rank: usize },

    /// A split into zero chunks was requested.
    #[error("cannot split a window into zero chunks")]
    ZeroChunks,

    /// The chosen split dimension has no iterations.
    #[error("split dimension {index} has no iterations")]
    EmptySplitDimension { index: usize },

    /// Window rank does not match the tensor it addresses.
    #[error("window rank {window} does not match tensor rank {tensor}")]
    RankMismatch { window: usize, tensor: usize },

    /// The window's range lies outside the tensor's logical shape.
    #[error("dimension {index}: range [{start}, {end}) outside extent {extent}")]
    OutOfShape {
        index: usize,
        start: i64,
        end: i64,
        extent: i64,
    },
}

/// Structured result of a kernel's `validate()` / `configure()`.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Tensor shapes are incompatible for the operation.
    #[error("shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: &'static str, detail: String },

    /// The data type is not supported by this kernel.
    #[error("unsupported dtype {dtype:?} in {op}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    /// Quantization parameters are malformed or inconsistent.
    #[error("invalid quantization in {op}: {detail}")]
    InvalidQuantization { op: &'static str, detail: String },

    /// A scalar argument is out of its permitted range.
    #[error("invalid argument in {op}: {detail}")]
    InvalidArgument { op: &'static str, detail: String },

    /// The execution window is inconsistent with a tensor.
    #[error("window error in {op}: {source}")]
    Window {
        op: &'static str,
        #[source]
        source: WindowError,
    },

    /// A tensor descriptor could not support the requested layout.
    #[error("tensor error in {op}: {source}")]
    Tensor {
        op: &'static str,
        #[source]
        source: TensorError,
    },
}

/// Fatal errors raised by a kernel's `run()`.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A worker received a partition inconsistent with the kernel's
    /// configured window.
    #[error("malformed partition for kernel '{kernel}': {detail}")]
    MalformedPartition { kernel: &'static str, detail: String },

    /// A numeric invariant was violated during execution.
    #[error("numeric invariant violated in kernel '{kernel}': {detail}")]
    Numeric { kernel: &'static str, detail: String },

    /// A tensor access failed mid-run.
    #[error("tensor access failed: {0}")]
    Tensor(#[from] TensorError),
}
