// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Border filling: materializes the halo around a tensor's logical
//! bounds so neighbour-reading kernels can run without per-access
//! bounds checks.
//!
//! The producer-side half of border handling. A consumer that reads
//! neighbourhoods shrinks its window instead (UNDEFINED) or is
//! scheduled after this kernel in a sequence (CONSTANT / REPLICATE).
//!
//! The iteration domain is the tensor's logical rows. Each partition
//! fills the left/right halo of its own rows; the partition owning
//! row 0 additionally fills the top strip and the one owning the last
//! row the bottom strip, so partitions never overlap.

use kernel_core::{BorderMode, Kernel, KernelError, ThreadContext, ValidateError, Window};
use std::sync::Arc;
use tensor_core::{BorderSize, Shape, Tensor, TensorInfo};

const OP: &str = "fill_border";

/// Kernel writing a constant or replicated halo into a tensor's
/// reserved padding.
pub struct FillBorderKernel {
    tensor: Arc<Tensor>,
    mode: BorderMode,
    border: BorderSize,
    constant: u8,
    window: Window,
}

impl FillBorderKernel {
    /// Checks that `info` can accept a `border` fill.
    pub fn validate(
        info: &TensorInfo,
        mode: BorderMode,
        border: BorderSize,
    ) -> Result<(), ValidateError> {
        if info.element_size() != 1 {
            return Err(ValidateError::UnsupportedDType {
                op: OP,
                dtype: info.dtype(),
            });
        }
        if info.shape().rank() > 2 {
            return Err(ValidateError::ShapeMismatch {
                op: OP,
                detail: format!("rank {} tensors cannot carry a border", info.shape().rank()),
            });
        }
        if info.shape().rank() == 1 && (border.top != 0 || border.bottom != 0) {
            return Err(ValidateError::InvalidArgument {
                op: OP,
                detail: "rank-1 tensors only support a horizontal border".into(),
            });
        }
        if mode != BorderMode::Undefined {
            let padding = info.padding();
            if padding.max(border) != padding {
                return Err(ValidateError::InvalidArgument {
                    op: OP,
                    detail: format!(
                        "reserved padding {padding} does not cover border {border}"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Binds the kernel to `tensor`. `constant` is the fill value for
    /// [`BorderMode::Constant`] and ignored otherwise.
    pub fn configure(
        tensor: Arc<Tensor>,
        mode: BorderMode,
        border: BorderSize,
        constant: u8,
    ) -> Result<Self, ValidateError> {
        Self::validate(tensor.info(), mode, border)?;
        let rows = tensor.info().shape().rows();
        let window = Window::from_shape(&Shape::vector(rows));
        tracing::debug!(rows, ?mode, %border, "configured border fill");
        Ok(Self {
            tensor,
            mode,
            border,
            constant,
            window,
        })
    }

    fn fill_row_halo(&self, y: i64, cols: i64) -> Result<(), KernelError> {
        let b = self.border;
        if b.left > 0 {
            let value = match self.mode {
                BorderMode::Constant => self.constant,
                BorderMode::Replicate => self.tensor.read_u8(y, 0)?,
                BorderMode::Undefined => unreachable!(),
            };
            // SAFETY: each logical row's halo is written only by the
            // partition that owns the row.
            unsafe { self.tensor.row_span_u8_mut(y, -i64::from(b.left)..0) }.fill(value);
        }
        if b.right > 0 {
            let value = match self.mode {
                BorderMode::Constant => self.constant,
                BorderMode::Replicate => self.tensor.read_u8(y, cols - 1)?,
                BorderMode::Undefined => unreachable!(),
            };
            // SAFETY: as above.
            unsafe { self.tensor.row_span_u8_mut(y, cols..cols + i64::from(b.right)) }
                .fill(value);
        }
        Ok(())
    }

    /// Fills the strip of `count` physical rows starting at `first`,
    /// sourcing from the extended logical row `source` for REPLICATE.
    fn fill_strip(&self, first: usize, count: u32, source: i64) {
        let info = self.tensor.info();
        let b = self.border;
        let left = info.padding().left as usize;
        let span = left - b.left as usize..left + info.shape().cols() + b.right as usize;
        for prow in first..first + count as usize {
            // SAFETY: top/bottom strips belong exclusively to the
            // partitions owning the first and last logical row.
            let dst = unsafe { self.tensor.phys_row_u8_mut(prow) };
            match self.mode {
                BorderMode::Constant => dst[span.clone()].fill(self.constant),
                BorderMode::Replicate => {
                    let source_prow = (source + i64::from(info.padding().top)) as usize;
                    let src = self.tensor.phys_row_u8(source_prow);
                    dst[span.clone()].copy_from_slice(&src[span.clone()]);
                }
                BorderMode::Undefined => unreachable!(),
            }
        }
    }
}

impl Kernel for FillBorderKernel {
    fn name(&self) -> &'static str {
        OP
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn run(&self, window: &Window, _ctx: &ThreadContext) -> Result<(), KernelError> {
        if self.mode == BorderMode::Undefined || self.border.is_empty() {
            return Ok(());
        }
        let info = self.tensor.info();
        let rows = info.shape().rows() as i64;
        let cols = info.shape().cols() as i64;
        let b = self.border;

        for y in window.dim(0).iter() {
            self.fill_row_halo(y, cols)?;
        }
        // The halo of the first/last row must exist before the corner
        // regions of the strips are replicated from it.
        if b.top > 0 && window.dim(0).start() == 0 {
            let first = (info.padding().top - b.top) as usize;
            self.fill_strip(first, b.top, 0);
        }
        if b.bottom > 0 && window.dim(0).end() == rows {
            let first = info.padding().top as usize + rows as usize;
            self.fill_strip(first, b.bottom, rows - 1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::DType;

    fn padded_tensor(rows: usize, cols: usize, border: BorderSize, values: &[u8]) -> Arc<Tensor> {
        let mut info = TensorInfo::new(Shape::matrix(rows, cols), DType::U8);
        info.extend_padding(border).unwrap();
        let t = Tensor::zeros(info);
        for (y, row) in values.chunks(cols).enumerate() {
            // SAFETY: single-threaded test setup.
            unsafe { t.row_u8_mut(y as i64) }.copy_from_slice(row);
        }
        Arc::new(t)
    }

    fn run_single(kernel: &FillBorderKernel) {
        kernel
            .run(&kernel.window().clone(), &ThreadContext::single())
            .unwrap();
    }

    #[test]
    fn test_constant_fill() {
        let border = BorderSize::uniform(1);
        let t = padded_tensor(2, 2, border, &[1, 2, 3, 4]);
        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Constant, border, 9).unwrap();
        run_single(&kernel);

        // Physical 4x4 layout, halo all 9s.
        assert_eq!(t.phys_row_u8(0), [9, 9, 9, 9]);
        assert_eq!(t.phys_row_u8(1), [9, 1, 2, 9]);
        assert_eq!(t.phys_row_u8(2), [9, 3, 4, 9]);
        assert_eq!(t.phys_row_u8(3), [9, 9, 9, 9]);
    }

    #[test]
    fn test_replicate_fill() {
        let border = BorderSize::uniform(1);
        let t = padded_tensor(2, 2, border, &[1, 2, 3, 4]);
        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Replicate, border, 0).unwrap();
        run_single(&kernel);

        // Corners replicate the corner elements.
        assert_eq!(t.phys_row_u8(0), [1, 1, 2, 2]);
        assert_eq!(t.phys_row_u8(1), [1, 1, 2, 2]);
        assert_eq!(t.phys_row_u8(2), [3, 3, 4, 4]);
        assert_eq!(t.phys_row_u8(3), [3, 3, 4, 4]);
    }

    #[test]
    fn test_undefined_is_noop() {
        let border = BorderSize::uniform(1);
        let t = padded_tensor(2, 2, border, &[1, 2, 3, 4]);
        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Undefined, border, 7).unwrap();
        run_single(&kernel);
        assert_eq!(t.phys_row_u8(0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_border_smaller_than_padding() {
        // Padding 2, border 1: only the innermost halo ring is written.
        let padding = BorderSize::uniform(2);
        let mut info = TensorInfo::new(Shape::matrix(1, 1), DType::U8);
        info.extend_padding(padding).unwrap();
        let t = Arc::new(Tensor::zeros(info));
        // SAFETY: single-threaded test setup.
        unsafe { t.row_u8_mut(0)[0] = 5 };

        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Constant, BorderSize::uniform(1), 8)
                .unwrap();
        run_single(&kernel);

        assert_eq!(t.phys_row_u8(0), [0, 0, 0, 0, 0]);
        assert_eq!(t.phys_row_u8(1), [0, 8, 8, 8, 0]);
        assert_eq!(t.phys_row_u8(2), [0, 8, 5, 8, 0]);
        assert_eq!(t.phys_row_u8(3), [0, 8, 8, 8, 0]);
        assert_eq!(t.phys_row_u8(4), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_idempotent() {
        let border = BorderSize::uniform(1);
        let t = padded_tensor(2, 2, border, &[1, 2, 3, 4]);
        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Replicate, border, 0).unwrap();
        run_single(&kernel);
        let first: Vec<u8> = t.as_bytes().to_vec();
        run_single(&kernel);
        assert_eq!(t.as_bytes(), first.as_slice());
    }

    #[test]
    fn test_validate_rejects_uncovered_border() {
        let info = TensorInfo::new(Shape::matrix(2, 2), DType::U8);
        let err = FillBorderKernel::validate(&info, BorderMode::Constant, BorderSize::uniform(1))
            .unwrap_err();
        assert!(matches!(err, ValidateError::InvalidArgument { .. }));
        // UNDEFINED needs no reserved padding.
        FillBorderKernel::validate(&info, BorderMode::Undefined, BorderSize::uniform(1)).unwrap();
    }

    #[test]
    fn test_validate_rejects_wide_dtype() {
        let info = TensorInfo::new(Shape::matrix(2, 2), DType::S32);
        let err = FillBorderKernel::validate(&info, BorderMode::Constant, BorderSize::ZERO)
            .unwrap_err();
        assert!(matches!(err, ValidateError::UnsupportedDType { .. }));
    }

    #[test]
    fn test_rank1_horizontal_border() {
        let border = BorderSize::new(0, 0, 2, 2);
        let mut info = TensorInfo::new(Shape::vector(3), DType::U8);
        info.extend_padding(border).unwrap();
        let t = Arc::new(Tensor::zeros(info));
        // SAFETY: single-threaded test setup.
        unsafe { t.row_u8_mut(0) }.copy_from_slice(&[4, 5, 6]);

        let kernel =
            FillBorderKernel::configure(t.clone(), BorderMode::Replicate, border, 0).unwrap();
        run_single(&kernel);
        assert_eq!(t.phys_row_u8(0), [4, 4, 4, 5, 6, 6, 6]);
    }
}
