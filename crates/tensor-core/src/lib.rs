// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor descriptors and padded buffers for the kernel execution substrate.
//!
//! This crate provides:
//! - [`Shape`] — n-dimensional extents in row-major (C) order.
//! - [`DType`] — supported element types (quantized u8, i32 accumulators, f32).
//! - [`QuantizationInfo`] — uniform asymmetric quantization parameters.
//! - [`BorderSize`] — the halo extent around a tensor's logical bounds,
//!   doubling as physical padding in [`TensorInfo`].
//! - [`TensorInfo`] — the read-only descriptor consumed by windows,
//!   border handling and the scheduler.
//! - [`Tensor`] — a contiguous buffer laid out per its descriptor,
//!   including physical padding for materialized halos.
//!
//! # Design Goals
//! - Descriptors are plain values: cheap to clone, compare and log.
//! - Buffers are shareable across worker threads; mutable access is
//!   restricted to provably disjoint row ranges.
//! - Clean error types via `thiserror`.

mod border;
mod dtype;
mod error;
mod info;
mod quantization;
mod shape;
mod tensor;

pub use border::BorderSize;
pub use dtype::DType;
pub use error::TensorError;
pub use info::TensorInfo;
pub use quantization::QuantizationInfo;
pub use shape::Shape;
pub use tensor::Tensor;
