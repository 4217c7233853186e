// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Halo extents around a tensor's logical bounds.

use std::fmt;

/// The number of out-of-bounds elements on each side of a tensor that a
/// neighbour-reading kernel may touch.
///
/// A kernel derives its border size statically from its access footprint
/// (e.g. a 3×3 filter needs a border of 1 on every side). The same type
/// describes the physical padding a [`crate::TensorInfo`] reserves so the
/// halo can be materialized in place.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct BorderSize {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl BorderSize {
    /// No border on any side.
    pub const ZERO: BorderSize = BorderSize {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };

    /// Creates a border with the given extent on every side.
    pub fn uniform(size: u32) -> Self {
        Self {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }

    /// Creates a border with per-side extents.
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Returns `true` if every side is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::ZERO
    }

    /// Returns the element-wise maximum of two borders.
    ///
    /// Used when several kernels read the same tensor: the reserved
    /// padding must cover the largest footprint.
    pub fn max(self, other: BorderSize) -> BorderSize {
        BorderSize {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.max(other.left),
            right: self.right.max(other.right),
        }
    }
}

impl fmt::Display for BorderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{t:{} b:{} l:{} r:{}}}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_empty() {
        assert!(BorderSize::ZERO.is_empty());
        assert!(!BorderSize::uniform(1).is_empty());
    }

    #[test]
    fn test_uniform() {
        let b = BorderSize::uniform(2);
        assert_eq!(b, BorderSize::new(2, 2, 2, 2));
    }

    #[test]
    fn test_max() {
        let a = BorderSize::new(1, 0, 3, 0);
        let b = BorderSize::new(0, 2, 1, 4);
        assert_eq!(a.max(b), BorderSize::new(1, 2, 3, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BorderSize::uniform(1)), "{t:1 b:1 l:1 r:1}");
    }
}
