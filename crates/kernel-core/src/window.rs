// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The n-dimensional iteration domain ("window") a kernel must visit.
//!
//! Dimensions follow the row-major convention of
//! [`tensor_core::Shape`]: dimension 0 is the outermost (rows for a
//! matrix), the last dimension is the innermost (columns).

use crate::WindowError;
use tensor_core::{BorderSize, Shape, TensorInfo};

/// A half-open index range `[start, end)` visited with a stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimension {
    start: i64,
    end: i64,
    step: i64,
}

impl Dimension {
    /// Creates a dimension range.
    ///
    /// Invariants: `end >= start`, `step > 0`.
    pub fn new(start: i64, end: i64, step: i64) -> Result<Self, WindowError> {
        if end < start || step <= 0 {
            return Err(WindowError::InvalidDimension { start, end, step });
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of indices visited: `ceil((end - start) / step)`.
    pub fn num_iterations(&self) -> i64 {
        (self.end - self.start + self.step - 1) / self.step
    }

    /// Iterates the indices this dimension visits.
    pub fn iter(&self) -> impl Iterator<Item = i64> {
        let (start, end, step) = (self.start, self.end, self.step);
        (start..end).step_by(step as usize)
    }
}

/// An ordered list of [`Dimension`]s describing the iteration domain of
/// one kernel execution.
///
/// Created when a kernel's `configure()` determines its output shape;
/// immutable once handed to `run()`. [`Window::split`] produces new
/// windows with identical rank and disjoint, exactly-tiling coverage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    dims: Vec<Dimension>,
}

impl Window {
    /// Creates an empty window of the given rank (all dimensions
    /// `[0, 0)` step 1).
    pub fn new(rank: usize) -> Self {
        Self {
            dims: vec![
                Dimension {
                    start: 0,
                    end: 0,
                    step: 1
                };
                rank
            ],
        }
    }

    /// Creates the full iteration domain over a logical shape, step 1
    /// in every dimension.
    ///
    /// # Examples
    /// ```
    /// use kernel_core::Window;
    /// use tensor_core::Shape;
    /// let w = Window::from_shape(&Shape::matrix(4, 8));
    /// assert_eq!(w.total_iterations(), 32);
    /// ```
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            dims: shape
                .dims()
                .iter()
                .map(|&d| Dimension {
                    start: 0,
                    end: d as i64,
                    step: 1,
                })
                .collect(),
        }
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Replaces the range of dimension `index`.
    pub fn set(&mut self, index: usize, dim: Dimension) -> Result<(), WindowError> {
        let rank = self.rank();
        let slot = self
            .dims
            .get_mut(index)
            .ok_or(WindowError::DimensionOutOfRange { index, rank })?;
        *slot = dim;
        Ok(())
    }

    /// Returns dimension `index`.
    ///
    /// # Panics
    /// Panics when `index >= rank()`; kernels only ever index windows
    /// whose rank was fixed at configure time.
    pub fn dim(&self, index: usize) -> Dimension {
        self.dims[index]
    }

    /// Number of iterations along dimension `index`.
    pub fn num_iterations(&self, index: usize) -> i64 {
        self.dims[index].num_iterations()
    }

    /// Total number of points in the domain.
    pub fn total_iterations(&self) -> i64 {
        self.dims.iter().map(Dimension::num_iterations).product()
    }

    /// Splits dimension `index` into at most `chunks` sub-windows.
    ///
    /// The sub-windows tile `[start, end)` exactly — pairwise disjoint,
    /// no gaps — with the last chunk absorbing any remainder. Requesting
    /// more chunks than iterations degrades to one chunk per iteration;
    /// a zero-size chunk is never produced.
    pub fn split(&self, index: usize, chunks: usize) -> Result<Vec<Window>, WindowError> {
        let rank = self.rank();
        if index >= rank {
            return Err(WindowError::DimensionOutOfRange { index, rank });
        }
        if chunks == 0 {
            return Err(WindowError::ZeroChunks);
        }
        let dim = self.dims[index];
        let iterations = dim.num_iterations();
        if iterations == 0 {
            return Err(WindowError::EmptySplitDimension { index });
        }

        let chunks = (chunks as i64).min(iterations);
        let per_chunk = iterations / chunks;

        let mut out = Vec::with_capacity(chunks as usize);
        for c in 0..chunks {
            let start = dim.start + c * per_chunk * dim.step;
            let end = if c == chunks - 1 {
                dim.end
            } else {
                dim.start + (c + 1) * per_chunk * dim.step
            };
            let mut w = self.clone();
            w.dims[index] = Dimension {
                start,
                end,
                step: dim.step,
            };
            out.push(w);
        }
        Ok(out)
    }

    /// Shrinks the window so a kernel with the given border never reads
    /// outside the logical bounds (UNDEFINED border handling).
    ///
    /// Top/bottom shrink dimension 0, left/right shrink the innermost
    /// dimension. Ranges collapse to empty rather than inverting.
    pub fn shrink(&self, border: BorderSize) -> Window {
        let mut w = self.clone();
        let rank = w.dims.len();
        if rank == 0 {
            return w;
        }
        let last = rank - 1;
        if rank >= 2 {
            let d = &mut w.dims[0];
            d.start += border.top as i64;
            d.end = (d.end - border.bottom as i64).max(d.start);
        }
        let d = &mut w.dims[last];
        d.start += border.left as i64;
        d.end = (d.end - border.right as i64).max(d.start);
        w
    }

    /// Checks this window against the tensor it addresses: ranks must
    /// match and the visited range must lie within the logical shape.
    ///
    /// A mismatch is a configuration-time error; it never surfaces at
    /// run time.
    pub fn validate_against(&self, info: &TensorInfo) -> Result<(), WindowError> {
        let shape = info.shape();
        if self.rank() != shape.rank() {
            return Err(WindowError::RankMismatch {
                window: self.rank(),
                tensor: shape.rank(),
            });
        }
        for (i, dim) in self.dims.iter().enumerate() {
            let extent = shape.dims()[i] as i64;
            if dim.start < 0 || dim.end > extent {
                return Err(WindowError::OutOfShape {
                    index: i,
                    start: dim.start,
                    end: dim.end,
                    extent,
                });
            }
        }
        Ok(())
    }
}
