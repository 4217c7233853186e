// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The tensor buffer type shared across worker threads.
//!
//! # Concurrency Model
//! During a parallel kernel run every worker reads the same input
//! tensors and writes a disjoint region of the same output tensor.
//! `Tensor` therefore exposes:
//!
//! - safe shared read accessors (`row_i32`, `row_u8`, ...), scoped to
//!   the rows they address, and
//! - `unsafe` row-granular write accessors whose safety contract is the
//!   scheduler's disjoint-window guarantee: no two live mutable row
//!   slices may overlap, and no reader may observe a row while it is
//!   being written.
//!
//! Every view is carved out of the raw base pointer of an
//! `UnsafeCell`-wrapped word buffer, so a reader of one row and a
//! writer of another never materialize overlapping references. Only
//! [`Tensor::as_bytes`] spans the whole buffer; it is for quiescent
//! tensors with no writer in flight.
//!
//! The buffer is backed by `u64` words so that 4-byte element views are
//! always aligned.

use crate::{DType, Shape, TensorError, TensorInfo};
use std::cell::UnsafeCell;

/// An owned tensor buffer laid out per its [`TensorInfo`], physical
/// padding included.
pub struct Tensor {
    info: TensorInfo,
    data: Box<[UnsafeCell<u64>]>,
    len_bytes: usize,
}

// SAFETY: all mutation goes through the unsafe row accessors, whose
// contract (disjoint live ranges, writers exclusive with readers) is
// upheld by the scheduler's disjoint-window partitioning.
unsafe impl Sync for Tensor {}

impl Tensor {
    /// Creates a zero-filled tensor for the given descriptor.
    pub fn zeros(info: TensorInfo) -> Self {
        let len_bytes = info.total_size_bytes();
        let words = len_bytes.div_ceil(8);
        Self {
            info,
            data: (0..words).map(|_| UnsafeCell::new(0)).collect(),
            len_bytes,
        }
    }

    /// Base pointer of the physical buffer.
    ///
    /// Views are derived from this pointer rather than from a buffer-
    /// wide reference, so disjoint row views never alias.
    fn base_ptr(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.data.as_ptr()) as *mut u8
    }

    /// Creates an unpadded `S32` tensor from the given values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::from_i32(Shape::matrix(2, 2), &[1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.row_i32(1), [3, 4]);
    /// ```
    pub fn from_i32(shape: Shape, values: &[i32]) -> Result<Self, TensorError> {
        if values.len() != shape.num_elements() {
            return Err(TensorError::BufferSizeMismatch {
                expected: shape.num_elements(),
                actual: values.len(),
                shape,
            });
        }
        let mut t = Self::zeros(TensorInfo::new(shape, DType::S32));
        let start = t.info.offset_first_element();
        for (dst, src) in t.bytes_mut_exclusive()[start..].chunks_exact_mut(4).zip(values) {
            dst.copy_from_slice(&src.to_ne_bytes());
        }
        Ok(t)
    }

    /// Creates an unpadded tensor from u8 values.
    ///
    /// `dtype` must be a 1-byte type (`U8` or `QAsymmU8`).
    pub fn from_u8(shape: Shape, dtype: DType, values: &[u8]) -> Result<Self, TensorError> {
        if dtype.size_bytes() != 1 {
            return Err(TensorError::DTypeMismatch {
                op: "from_u8",
                expected: DType::U8,
                actual: dtype,
            });
        }
        if values.len() != shape.num_elements() {
            return Err(TensorError::BufferSizeMismatch {
                expected: shape.num_elements(),
                actual: values.len(),
                shape,
            });
        }
        let mut t = Self::zeros(TensorInfo::new(shape, dtype));
        let start = t.info.offset_first_element();
        t.bytes_mut_exclusive()[start..start + values.len()].copy_from_slice(values);
        Ok(t)
    }

    /// Returns the tensor's descriptor.
    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    /// Returns the full physical buffer as bytes, padding included.
    ///
    /// The view spans every row, so it is only safe on a quiescent
    /// tensor: no row writer may be live or running while it exists.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: quiescent-tensor read per the concurrency model above.
        unsafe { std::slice::from_raw_parts(self.base_ptr() as *const u8, self.len_bytes) }
    }

    /// Exclusive byte access for construction (`&mut self` guarantees
    /// no aliasing).
    fn bytes_mut_exclusive(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.base_ptr(), self.len_bytes) }
    }

    // ── Logical read accessors ─────────────────────────────────

    /// Returns logical row `row` as `&[i32]` (padding excluded).
    ///
    /// # Panics
    /// Panics if the dtype is not `S32` or the row is out of bounds;
    /// a malformed partition window is an unrecoverable invariant
    /// violation.
    pub fn row_i32(&self, row: i64) -> &[i32] {
        self.check_dtype("row_i32", DType::S32);
        let start = self
            .info
            .offset_element(row, 0)
            .expect("row within logical bounds");
        // SAFETY: the view covers this row only; row offsets are
        // 4-byte aligned in the u64-backed buffer.
        unsafe {
            std::slice::from_raw_parts(
                self.base_ptr().add(start) as *const i32,
                self.info.shape().cols(),
            )
        }
    }

    /// Returns a rank-1 `S32` tensor's logical contents.
    pub fn vec_i32(&self) -> &[i32] {
        self.row_i32(0)
    }

    /// Returns logical row `row` as `&[u8]` (padding excluded).
    pub fn row_u8(&self, row: i64) -> &[u8] {
        self.check_dtype_width("row_u8", 1);
        let start = self
            .info
            .offset_element(row, 0)
            .expect("row within logical bounds");
        // SAFETY: the view covers this row only.
        unsafe {
            std::slice::from_raw_parts(
                self.base_ptr().add(start) as *const u8,
                self.info.shape().cols(),
            )
        }
    }

    /// Reads a single u8 element; negative coordinates address the halo.
    pub fn read_u8(&self, row: i64, col: i64) -> Result<u8, TensorError> {
        self.check_dtype_width("read_u8", 1);
        let offset = self.info.offset_element(row, col)?;
        // SAFETY: single-element read, no reference formed over rows a
        // concurrent partition may be writing.
        Ok(unsafe { self.base_ptr().add(offset).read() })
    }

    /// Reads a single i32 element; negative coordinates address the halo.
    pub fn read_i32(&self, row: i64, col: i64) -> Result<i32, TensorError> {
        self.check_dtype("read_i32", DType::S32);
        let offset = self.info.offset_element(row, col)?;
        // SAFETY: aligned single-element read, see read_u8.
        Ok(unsafe { (self.base_ptr().add(offset) as *const i32).read() })
    }

    // ── Physical row accessors (border materialization) ────────

    /// Returns physical row `prow` (padding included) as `&[u8]`.
    pub fn phys_row_u8(&self, prow: usize) -> &[u8] {
        self.check_dtype_width("phys_row_u8", 1);
        let stride = self.info.row_stride_bytes();
        // SAFETY: the view covers this physical row only.
        unsafe { std::slice::from_raw_parts(self.base_ptr().add(prow * stride), stride) }
    }

    // ── Disjoint write accessors ───────────────────────────────

    /// Returns logical row `row` as `&mut [u8]`, padding excluded.
    ///
    /// # Safety
    /// The caller must guarantee that no other live reference — mutable
    /// or shared — overlaps this row for the lifetime of the returned
    /// slice. The scheduler's disjoint-window partitioning provides
    /// this for kernel `run()` implementations.
    pub unsafe fn row_u8_mut(&self, row: i64) -> &mut [u8] {
        self.check_dtype_width("row_u8_mut", 1);
        let start = self
            .info
            .offset_element(row, 0)
            .expect("row within logical bounds");
        std::slice::from_raw_parts_mut(self.base_ptr().add(start), self.info.shape().cols())
    }

    /// Returns the span `cols` of logical row `row` as `&mut [u8]`.
    ///
    /// Partitions that split along the column dimension use this so
    /// their mutable slices never overlap.
    ///
    /// # Safety
    /// Same contract as [`Tensor::row_u8_mut`].
    pub unsafe fn row_span_u8_mut(&self, row: i64, cols: std::ops::Range<i64>) -> &mut [u8] {
        self.check_dtype_width("row_span_u8_mut", 1);
        let start = self
            .info
            .offset_element(row, cols.start)
            .expect("span within logical bounds");
        let len = (cols.end - cols.start) as usize;
        std::slice::from_raw_parts_mut(self.base_ptr().add(start), len)
    }

    /// Returns physical row `prow` (padding included) as `&mut [u8]`.
    ///
    /// # Safety
    /// Same contract as [`Tensor::row_u8_mut`].
    pub unsafe fn phys_row_u8_mut(&self, prow: usize) -> &mut [u8] {
        self.check_dtype_width("phys_row_u8_mut", 1);
        let stride = self.info.row_stride_bytes();
        std::slice::from_raw_parts_mut(self.base_ptr().add(prow * stride), stride)
    }

    // ── Invariant checks ───────────────────────────────────────

    fn check_dtype(&self, op: &'static str, expected: DType) {
        assert_eq!(
            self.info.dtype(),
            expected,
            "{op} called on {} tensor",
            self.info.dtype().as_str()
        );
    }

    fn check_dtype_width(&self, op: &'static str, width: usize) {
        assert_eq!(
            self.info.dtype().size_bytes(),
            width,
            "{op} called on {} tensor",
            self.info.dtype().as_str()
        );
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", self.info.shape())
            .field("dtype", &self.info.dtype())
            .field("padding", &self.info.padding())
            .finish()
    }
}
