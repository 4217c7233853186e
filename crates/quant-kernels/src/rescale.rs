// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Quantized rescale: i32 accumulators down to asymmetric u8.
//!
//! Fuses the zero-point offset contribution of a quantized matrix
//! multiply (column sums scaled by the lhs offset, row sums by the rhs
//! offset, plus the constant `a_offset * b_offset * k` term) with the
//! fixed-point output stage: multiply, shift, round, re-offset, clamp,
//! narrow.
//!
//! ```text
//!   acc = mm[y][x]
//!       + a_offset * col_sums[x]
//!       + b_offset * row_sums[y]
//!       + a_offset * b_offset * k
//!       + bias[x]
//!   out[y][x] = clamp(rescale(acc) + offset, min, max) as u8
//! ```

use crate::fixedpoint::{multiply_by_quantized_multiplier, quantize_multiplier_smaller_than_one};
use kernel_core::{Kernel, KernelError, ThreadContext, ValidateError, Window};
use std::sync::Arc;
use tensor_core::{DType, QuantizationInfo, Tensor, TensorInfo};

const OP: &str = "quantized_rescale";

/// Fixed-point output-stage parameters.
///
/// `multiplier` is a Q0.31 value in `[2^30, 2^31)` and `shift` the
/// accompanying right shift; together they encode the composed
/// requantization scale. `offset` is the output zero point, `min`/`max`
/// the clamp bounds in the narrowed domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RescaleParams {
    pub multiplier: i32,
    pub shift: i32,
    pub offset: i32,
    pub min: i32,
    pub max: i32,
}

impl RescaleParams {
    /// Parameters covering the full u8 range with a zero output offset.
    pub fn full_range(multiplier: i32, shift: i32) -> Self {
        Self {
            multiplier,
            shift,
            offset: 0,
            min: 0,
            max: 255,
        }
    }
}

/// Zero-point bookkeeping for the matrix multiply that produced the
/// accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RescaleConfig {
    /// Negated zero point of the lhs operand.
    pub a_offset: i32,
    /// Negated zero point of the rhs operand.
    pub b_offset: i32,
    /// Reduction depth of the matrix multiply.
    pub k_depth: usize,
    pub params: RescaleParams,
}

impl RescaleConfig {
    /// Derives the config from the quantization of the three tensors
    /// involved in the matrix multiply.
    ///
    /// The composed scale `input * weights / output` must land in
    /// `(0, 1]`; `None` otherwise.
    pub fn from_quantization(
        input: QuantizationInfo,
        weights: QuantizationInfo,
        output: QuantizationInfo,
        k_depth: usize,
    ) -> Option<Self> {
        let real_scale = f64::from(input.scale) * f64::from(weights.scale) / f64::from(output.scale);
        let (multiplier, shift) = quantize_multiplier_smaller_than_one(real_scale)?;
        Some(Self {
            a_offset: -input.offset,
            b_offset: -weights.offset,
            k_depth,
            params: RescaleParams {
                multiplier,
                shift,
                offset: output.offset,
                min: 0,
                max: 255,
            },
        })
    }
}

/// Kernel applying [`RescaleConfig`] to an i32 accumulator tensor.
pub struct QuantizedRescaleKernel {
    mm: Arc<Tensor>,
    col_sums: Option<Arc<Tensor>>,
    row_sums: Option<Arc<Tensor>>,
    bias: Option<Arc<Tensor>>,
    output: Arc<Tensor>,
    config: RescaleConfig,
    k_offset: i32,
    window: Window,
}

impl QuantizedRescaleKernel {
    /// Checks a candidate configuration without touching buffers.
    pub fn validate(
        mm: &TensorInfo,
        col_sums: Option<&TensorInfo>,
        row_sums: Option<&TensorInfo>,
        bias: Option<&TensorInfo>,
        output: &TensorInfo,
        config: &RescaleConfig,
    ) -> Result<(), ValidateError> {
        if mm.dtype() != DType::S32 {
            return Err(ValidateError::UnsupportedDType {
                op: OP,
                dtype: mm.dtype(),
            });
        }
        if !output.dtype().is_quantized() {
            return Err(ValidateError::UnsupportedDType {
                op: OP,
                dtype: output.dtype(),
            });
        }
        if mm.shape().rank() > 2 {
            return Err(ValidateError::ShapeMismatch {
                op: OP,
                detail: format!("accumulator rank {} exceeds 2", mm.shape().rank()),
            });
        }
        if output.shape() != mm.shape() {
            return Err(ValidateError::ShapeMismatch {
                op: OP,
                detail: format!(
                    "output shape {} does not match accumulator shape {}",
                    output.shape(),
                    mm.shape()
                ),
            });
        }

        let rows = mm.shape().rows();
        let cols = mm.shape().cols();
        check_reduction(col_sums, config.a_offset != 0, "col_sums", cols)?;
        check_reduction(row_sums, config.b_offset != 0, "row_sums", rows)?;
        if let Some(bias) = bias {
            check_vector(bias, "bias", cols)?;
        }

        let p = &config.params;
        if p.multiplier < 0 {
            return Err(ValidateError::InvalidQuantization {
                op: OP,
                detail: format!("negative multiplier {}", p.multiplier),
            });
        }
        if !(-31..=31).contains(&p.shift) {
            return Err(ValidateError::InvalidQuantization {
                op: OP,
                detail: format!("shift {} outside [-31, 31]", p.shift),
            });
        }
        if !(0..=255).contains(&p.offset) {
            return Err(ValidateError::InvalidQuantization {
                op: OP,
                detail: format!("output offset {} outside [0, 255]", p.offset),
            });
        }
        if p.min < 0 || p.max > 255 || p.min > p.max {
            return Err(ValidateError::InvalidArgument {
                op: OP,
                detail: format!("clamp bounds [{}, {}] invalid for u8", p.min, p.max),
            });
        }
        Ok(())
    }

    /// Validates the tensors and binds the kernel to them.
    ///
    /// The execution window covers the output's logical shape.
    pub fn configure(
        mm: Arc<Tensor>,
        col_sums: Option<Arc<Tensor>>,
        row_sums: Option<Arc<Tensor>>,
        bias: Option<Arc<Tensor>>,
        output: Arc<Tensor>,
        config: RescaleConfig,
    ) -> Result<Self, ValidateError> {
        Self::validate(
            mm.info(),
            col_sums.as_deref().map(Tensor::info),
            row_sums.as_deref().map(Tensor::info),
            bias.as_deref().map(Tensor::info),
            output.info(),
            &config,
        )?;
        let window = Window::from_shape(output.info().shape());
        window
            .validate_against(output.info())
            .map_err(|source| ValidateError::Window { op: OP, source })?;
        // Constant term: only present when both operands carry a
        // nonzero zero point.
        let k_offset = config
            .a_offset
            .wrapping_mul(config.b_offset)
            .wrapping_mul(config.k_depth as i32);
        tracing::debug!(
            rows = output.info().shape().rows(),
            cols = output.info().shape().cols(),
            a_offset = config.a_offset,
            b_offset = config.b_offset,
            "configured quantized rescale"
        );
        Ok(Self {
            mm,
            col_sums,
            row_sums,
            bias,
            output,
            config,
            k_offset,
            window,
        })
    }
}

fn check_reduction(
    info: Option<&TensorInfo>,
    required: bool,
    name: &'static str,
    len: usize,
) -> Result<(), ValidateError> {
    match (info, required) {
        (Some(info), _) => check_vector(info, name, len),
        (None, true) => Err(ValidateError::ShapeMismatch {
            op: OP,
            detail: format!("{name} required when its operand offset is nonzero"),
        }),
        (None, false) => Ok(()),
    }
}

fn check_vector(info: &TensorInfo, name: &'static str, len: usize) -> Result<(), ValidateError> {
    if info.dtype() != DType::S32 {
        return Err(ValidateError::UnsupportedDType {
            op: OP,
            dtype: info.dtype(),
        });
    }
    if info.shape().rank() != 1 || info.shape().num_elements() != len {
        return Err(ValidateError::ShapeMismatch {
            op: OP,
            detail: format!("{name} must be a rank-1 tensor of {len} elements"),
        });
    }
    Ok(())
}

impl Kernel for QuantizedRescaleKernel {
    fn name(&self) -> &'static str {
        OP
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn run(&self, window: &Window, _ctx: &ThreadContext) -> Result<(), KernelError> {
        if window.rank() != self.window.rank() {
            return Err(KernelError::MalformedPartition {
                kernel: OP,
                detail: format!(
                    "partition rank {} does not match configured rank {}",
                    window.rank(),
                    self.window.rank()
                ),
            });
        }
        // Rank-1 accumulators execute as a single logical row.
        if window.rank() == 1 {
            self.process_row(0, window.dim(0));
        } else {
            for y in window.dim(0).iter() {
                self.process_row(y, window.dim(1));
            }
        }
        Ok(())
    }
}

impl QuantizedRescaleKernel {
    fn process_row(&self, y: i64, cols: kernel_core::Dimension) {
        let p = self.config.params;
        let acc_row = self.mm.row_i32(y);
        let row_term = self
            .row_sums
            .as_deref()
            .map_or(0, |s| self.config.b_offset.wrapping_mul(s.vec_i32()[y as usize]));
        let col_sums = self.col_sums.as_deref().map(Tensor::vec_i32);
        let bias = self.bias.as_deref().map(Tensor::vec_i32);
        let x0 = cols.start();
        // SAFETY: partitions handed out by the scheduler are pairwise
        // disjoint along the split dimension, so this span is written
        // by exactly one thread per dispatch.
        let out = unsafe { self.output.row_span_u8_mut(y, cols.start()..cols.end()) };
        for x in cols.iter() {
            let xi = x as usize;
            // The accumulation wraps, matching the two's-complement
            // behaviour of the i32 matrix-multiply accumulators it
            // extends.
            let mut acc = acc_row[xi].wrapping_add(row_term).wrapping_add(self.k_offset);
            if let Some(sums) = col_sums {
                acc = acc.wrapping_add(self.config.a_offset.wrapping_mul(sums[xi]));
            }
            if let Some(bias) = bias {
                acc = acc.wrapping_add(bias[xi]);
            }
            let scaled = multiply_by_quantized_multiplier(acc, p.multiplier, p.shift)
                .wrapping_add(p.offset);
            out[(x - x0) as usize] = scaled.clamp(p.min, p.max) as u8;
        }
    }
}
