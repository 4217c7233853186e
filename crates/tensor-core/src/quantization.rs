// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Uniform asymmetric quantization parameters.

/// Maps real values to integers via `real = scale * (stored - offset)`.
///
/// `offset` is the zero-point: the stored integer that represents 0.0.
/// Attached to a [`crate::TensorInfo`] for quantized data types.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuantizationInfo {
    /// Step size between adjacent representable real values.
    pub scale: f32,
    /// Zero-point.
    pub offset: i32,
}

impl QuantizationInfo {
    /// Creates quantization parameters.
    pub fn new(scale: f32, offset: i32) -> Self {
        Self { scale, offset }
    }

    /// Quantizes a real value to u8, rounding to nearest and saturating.
    pub fn quantize(&self, value: f32) -> u8 {
        let q = (value / self.scale).round() as i32 + self.offset;
        q.clamp(0, 255) as u8
    }

    /// Dequantizes a stored u8 back to a real value.
    pub fn dequantize(&self, stored: u8) -> f32 {
        self.scale * (stored as i32 - self.offset) as f32
    }
}

impl Default for QuantizationInfo {
    /// Identity quantization: scale 1.0, zero-point 0.
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_round_trip() {
        let qi = QuantizationInfo::new(0.5, 10);
        let stored = qi.quantize(20.0); // 20 / 0.5 + 10 = 50
        assert_eq!(stored, 50);
        assert_eq!(qi.dequantize(stored), 20.0);
    }

    #[test]
    fn test_quantize_saturates() {
        let qi = QuantizationInfo::new(1.0, 0);
        assert_eq!(qi.quantize(300.0), 255);
        assert_eq!(qi.quantize(-5.0), 0);
    }

    #[test]
    fn test_zero_point_represents_zero() {
        let qi = QuantizationInfo::new(0.25, 128);
        assert_eq!(qi.quantize(0.0), 128);
        assert_eq!(qi.dequantize(128), 0.0);
    }
}
