// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-point requantization arithmetic.
//!
//! A real-valued scale factor is represented as a Q0.31 integer
//! multiplier in `[2^30, 2^31)` plus a right-shift amount. Applying it
//! is a rounding doubling high multiply followed by a rounding
//! power-of-two division, both saturating. The two stages break ties
//! differently: the multiply rounds halves toward positive infinity
//! (the `1 - 2^30` nudge then truncating division), while the division
//! rounds halves away from zero. The composition is bit-exact with the
//! gemmlowp reference operators.

/// Returns `round(a * b / 2^31)` with saturation.
///
/// The doubling high multiply of the fixed-point world: both inputs
/// are Q0.31 and the product is renormalized back to Q0.31. Halves
/// round toward positive infinity (`50.5 -> 51`, `-50.5 -> -50`),
/// matching gemmlowp's `SaturatingRoundingDoublingHighMul` and the
/// `vqrdmulh` instruction. The single overflowing case,
/// `i32::MIN * i32::MIN`, saturates to `i32::MAX`.
pub fn saturating_rounding_doubling_high_mul(a: i32, b: i32) -> i32 {
    if a == i32::MIN && b == i32::MIN {
        return i32::MAX;
    }
    let ab = i64::from(a) * i64::from(b);
    let nudge: i64 = if ab >= 0 { 1 << 30 } else { 1 - (1 << 30) };
    ((ab + nudge) / (1i64 << 31)) as i32
}

/// Returns `round(x / 2^exponent)`, rounding half away from zero.
///
/// `exponent` must be in `0..=31`.
pub fn rounding_divide_by_pow2(x: i32, exponent: i32) -> i32 {
    debug_assert!((0..=31).contains(&exponent));
    if exponent == 0 {
        return x;
    }
    let mask = (1i64 << exponent) - 1;
    let remainder = i64::from(x) & mask;
    let shifted = i64::from(x) >> exponent;
    // Negative values round away from zero, so the threshold for
    // rounding up is one larger there.
    let threshold = (mask >> 1) + i64::from(x < 0);
    (shifted + i64::from(remainder > threshold)) as i32
}

/// Applies a (multiplier, shift) requantization scale to `x`.
///
/// A positive `shift` divides after the multiply; a negative `shift`
/// multiplies by `2^-shift` before it, saturating on overflow.
pub fn multiply_by_quantized_multiplier(x: i32, multiplier: i32, shift: i32) -> i32 {
    if shift < 0 {
        let shifted = i64::from(x) << -shift;
        let clamped = shifted.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        saturating_rounding_doubling_high_mul(clamped, multiplier)
    } else {
        rounding_divide_by_pow2(saturating_rounding_doubling_high_mul(x, multiplier), shift)
    }
}

/// Decomposes a real scale in `(0, 1]` into a normalized Q0.31
/// multiplier in `[2^30, 2^31)` and a non-negative right shift.
///
/// Returns `None` for scales outside `(0, 1]` or non-finite inputs.
pub fn quantize_multiplier_smaller_than_one(scale: f64) -> Option<(i32, i32)> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return None;
    }
    let (mantissa, exponent) = frexp(scale);
    let mut shift = -exponent;
    let mut quantized = (mantissa * f64::from(1u32 << 31)).round() as i64;
    debug_assert!(quantized <= 1i64 << 31);
    if quantized == 1i64 << 31 {
        // Rounding pushed the mantissa to 1.0; renormalize.
        quantized /= 2;
        shift -= 1;
    }
    if shift < 0 {
        // scale == 1.0 decomposes to the identity multiplier.
        shift = 0;
        quantized = i64::from(i32::MAX);
    }
    Some((quantized as i32, shift))
}

/// Splits `x` into `(mantissa, exponent)` with `mantissa` in
/// `[0.5, 1)` and `x == mantissa * 2^exponent`.
fn frexp(x: f64) -> (f64, i32) {
    debug_assert!(x > 0.0 && x.is_finite());
    let exponent = x.log2().floor() as i32 + 1;
    let mantissa = x / f64::powi(2.0, exponent);
    if mantissa >= 1.0 {
        (mantissa / 2.0, exponent + 1)
    } else if mantissa < 0.5 {
        (mantissa * 2.0, exponent - 1)
    } else {
        (mantissa, exponent)
    }
}
