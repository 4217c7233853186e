// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor descriptors and buffers.

use crate::{DType, Shape};

/// Errors that can occur constructing or accessing tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided buffer size does not match the size implied by the
    /// shape and dtype.
    #[error("buffer size mismatch for shape {shape}: expected {expected} elements, got {actual}")]
    BufferSizeMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// A typed accessor was used against the wrong data type.
    #[error("dtype mismatch in {op}: expected {expected:?}, got {actual:?}")]
    DTypeMismatch {
        op: &'static str,
        expected: DType,
        actual: DType,
    },

    /// Padding was requested on a tensor rank that does not support it.
    #[error("padding is only supported for rank 1 and 2 tensors, got rank {rank}")]
    UnsupportedPadding { rank: usize },

    /// A coordinate lies outside the tensor's padded extent.
    #[error("coordinate ({row}, {col}) out of bounds for {shape} with padding {padding}")]
    OutOfBounds {
        row: i64,
        col: i64,
        shape: Shape,
        padding: crate::BorderSize,
    },
}
