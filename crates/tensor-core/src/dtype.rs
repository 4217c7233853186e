// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

/// Enumerates the element types a [`crate::Tensor`] can hold.
///
/// The substrate is quantization-centric: operator accumulators are
/// 32-bit signed integers and quantized activations are unsigned 8-bit
/// values with an asymmetric zero-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DType {
    /// 8-bit unsigned integer, asymmetrically quantized (zero-point in
    /// the attached [`crate::QuantizationInfo`]).
    QAsymmU8,
    /// 8-bit unsigned integer, raw (no quantization semantics).
    U8,
    /// 32-bit signed integer accumulator.
    S32,
    /// 32-bit IEEE 754 floating point.
    F32,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::QAsymmU8 | DType::U8 => 1,
            DType::S32 | DType::F32 => 4,
        }
    }

    /// Returns `true` for types carrying quantization semantics.
    pub fn is_quantized(self) -> bool {
        matches!(self, DType::QAsymmU8)
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::QAsymmU8 => "qasymm8",
            DType::U8 => "u8",
            DType::S32 => "s32",
            DType::F32 => "f32",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(DType::QAsymmU8.size_bytes(), 1);
        assert_eq!(DType::U8.size_bytes(), 1);
        assert_eq!(DType::S32.size_bytes(), 4);
        assert_eq!(DType::F32.size_bytes(), 4);
    }

    #[test]
    fn test_is_quantized() {
        assert!(DType::QAsymmU8.is_quantized());
        assert!(!DType::U8.is_quantized());
        assert!(!DType::S32.is_quantized());
    }

    #[test]
    fn test_labels() {
        assert_eq!(DType::QAsymmU8.as_str(), "qasymm8");
        assert_eq!(DType::S32.as_str(), "s32");
    }
}
