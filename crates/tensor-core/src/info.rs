// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor descriptors: shape, dtype, quantization and physical padding.

use crate::{BorderSize, DType, QuantizationInfo, Shape, TensorError};

/// The read-only descriptor for a tensor buffer.
///
/// `TensorInfo` is what windows, the border handler and the scheduler
/// consume: logical extents, element size and — when a neighbour-reading
/// kernel is involved — the physical padding reserved around the logical
/// bounds so a halo can be materialized in place.
///
/// # Physical Layout
/// Row-major. Each padded row is `left + cols + right` elements wide and
/// there are `top + rows + bottom` physical rows. The logical element
/// `(0, 0)` therefore lives at byte offset
/// `(top * padded_cols + left) * element_size`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorInfo {
    shape: Shape,
    dtype: DType,
    quantization: Option<QuantizationInfo>,
    padding: BorderSize,
}

impl TensorInfo {
    /// Creates a descriptor with no padding and no quantization.
    pub fn new(shape: Shape, dtype: DType) -> Self {
        Self {
            shape,
            dtype,
            quantization: None,
            padding: BorderSize::ZERO,
        }
    }

    /// Attaches quantization parameters (builder style).
    pub fn with_quantization(mut self, quantization: QuantizationInfo) -> Self {
        self.quantization = Some(quantization);
        self
    }

    /// Returns the logical shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the element data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the attached quantization parameters, if any.
    pub fn quantization(&self) -> Option<QuantizationInfo> {
        self.quantization
    }

    /// Returns the physical padding reserved around the logical bounds.
    pub fn padding(&self) -> BorderSize {
        self.padding
    }

    /// Grows the reserved padding to cover `border` (element-wise max).
    ///
    /// Called at configure time, before the buffer is allocated. Padding
    /// is a 2-D concept; requesting it on higher-rank tensors is a
    /// configuration error. Rank-1 tensors only support left/right.
    pub fn extend_padding(&mut self, border: BorderSize) -> Result<(), TensorError> {
        if self.shape.rank() > 2 {
            return Err(TensorError::UnsupportedPadding {
                rank: self.shape.rank(),
            });
        }
        if self.shape.rank() == 1 && (border.top != 0 || border.bottom != 0) {
            return Err(TensorError::UnsupportedPadding { rank: 1 });
        }
        self.padding = self.padding.max(border);
        Ok(())
    }

    /// Returns the size of a single element in bytes.
    pub fn element_size(&self) -> usize {
        self.dtype.size_bytes()
    }

    /// Returns the number of physical rows, including top/bottom padding.
    pub fn padded_rows(&self) -> usize {
        self.shape.rows() + (self.padding.top + self.padding.bottom) as usize
    }

    /// Returns the number of physical columns, including left/right padding.
    pub fn padded_cols(&self) -> usize {
        self.shape.cols() + (self.padding.left + self.padding.right) as usize
    }

    /// Returns the byte stride between consecutive physical rows.
    pub fn row_stride_bytes(&self) -> usize {
        self.padded_cols() * self.element_size()
    }

    /// Returns the total buffer size in bytes, padding included.
    pub fn total_size_bytes(&self) -> usize {
        self.padded_rows() * self.row_stride_bytes()
    }

    /// Returns the byte offset of the first logical element.
    pub fn offset_first_element(&self) -> usize {
        (self.padding.top as usize * self.padded_cols() + self.padding.left as usize)
            * self.element_size()
    }

    /// Returns the byte offset of logical element `(row, col)`.
    ///
    /// Negative coordinates address the halo; they must stay within the
    /// reserved padding.
    pub fn offset_element(&self, row: i64, col: i64) -> Result<usize, TensorError> {
        let prow = row + self.padding.top as i64;
        let pcol = col + self.padding.left as i64;
        if prow < 0
            || pcol < 0
            || prow >= self.padded_rows() as i64
            || pcol >= self.padded_cols() as i64
        {
            return Err(TensorError::OutOfBounds {
                row,
                col,
                shape: self.shape.clone(),
                padding: self.padding,
            });
        }
        Ok((prow as usize * self.padded_cols() + pcol as usize) * self.element_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpadded_layout() {
        let info = TensorInfo::new(Shape::matrix(3, 4), DType::S32);
        assert_eq!(info.padded_rows(), 3);
        assert_eq!(info.padded_cols(), 4);
        assert_eq!(info.row_stride_bytes(), 16);
        assert_eq!(info.total_size_bytes(), 48);
        assert_eq!(info.offset_first_element(), 0);
    }

    #[test]
    fn test_padded_layout() {
        let mut info = TensorInfo::new(Shape::matrix(2, 3), DType::QAsymmU8);
        info.extend_padding(BorderSize::uniform(1)).unwrap();
        // Physical: 4 rows × 5 cols.
        assert_eq!(info.padded_rows(), 4);
        assert_eq!(info.padded_cols(), 5);
        assert_eq!(info.total_size_bytes(), 20);
        assert_eq!(info.offset_first_element(), 6);
        assert_eq!(info.offset_element(0, 0).unwrap(), 6);
        assert_eq!(info.offset_element(-1, -1).unwrap(), 0);
        assert_eq!(info.offset_element(1, 2).unwrap(), 13);
    }

    #[test]
    fn test_extend_padding_takes_max() {
        let mut info = TensorInfo::new(Shape::matrix(2, 2), DType::U8);
        info.extend_padding(BorderSize::new(1, 0, 2, 0)).unwrap();
        info.extend_padding(BorderSize::new(0, 3, 1, 1)).unwrap();
        assert_eq!(info.padding(), BorderSize::new(1, 3, 2, 1));
    }

    #[test]
    fn test_padding_rejected_for_rank3() {
        let mut info = TensorInfo::new(Shape::new(vec![2, 2, 2]), DType::U8);
        let result = info.extend_padding(BorderSize::uniform(1));
        assert!(matches!(result, Err(TensorError::UnsupportedPadding { .. })));
    }

    #[test]
    fn test_rank1_padding_is_horizontal_only() {
        let mut info = TensorInfo::new(Shape::vector(8), DType::S32);
        assert!(info.extend_padding(BorderSize::new(1, 0, 0, 0)).is_err());
        info.extend_padding(BorderSize::new(0, 0, 2, 2)).unwrap();
        assert_eq!(info.padded_cols(), 12);
    }

    #[test]
    fn test_out_of_bounds() {
        let info = TensorInfo::new(Shape::matrix(2, 2), DType::U8);
        assert!(info.offset_element(-1, 0).is_err());
        assert!(info.offset_element(0, 2).is_err());
    }

    #[test]
    fn test_quantization_attachment() {
        let info = TensorInfo::new(Shape::vector(4), DType::QAsymmU8)
            .with_quantization(QuantizationInfo::new(0.5, 3));
        assert_eq!(info.quantization().unwrap().offset, 3);
    }
}
