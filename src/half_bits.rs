
//! Bit-exact conversion between 32-bit floats and 16-bit half precision patterns.
//! Half values are passed around as raw `u16` bits,
//! as this is how they appear in headers and in pixel memory.

use half::f16;
use half::slice::{HalfBitsSliceExt, HalfFloatSliceExt};
use std::cmp::Ordering;


/// The single quiet NaN pattern that every NaN converts to.
pub const HALF_NAN: u16 = 0x7e00;

/// Positive infinity.
pub const HALF_POS_INFINITY: u16 = 0x7c00;

/// Negative infinity.
pub const HALF_NEG_INFINITY: u16 = 0xfc00;

/// Smallest positive normalized half, `2^-14`.
pub const HALF_MIN_NORMAL: f32 = 6.103_515_6e-5;

/// Largest finite half.
pub const HALF_MAX: f32 = 65504.0;

/// Smallest positive `e` for which `1 + e != 1` in half precision, `2^-10`.
pub const HALF_EPSILON: f32 = 0.000_976_562_5;

/// Floats with at least this magnitude round to infinity.
pub const HALF_OVERFLOW_THRESHOLD: f32 = 65520.0;


/// Convert a float to the nearest half, rounding ties to even.
/// Magnitudes at or above `HALF_OVERFLOW_THRESHOLD` become infinity with the original sign,
/// signed zeroes keep their sign, and all NaN payloads collapse to `HALF_NAN`.
#[inline]
pub fn float_to_half_bits(value: f32) -> u16 {
    if value.is_nan() { HALF_NAN }
    else { f16::from_f32(value).to_bits() }
}

/// Convert half bits to the exactly representable float.
#[inline]
pub fn half_bits_to_float(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

/// Whether the bits encode any half NaN, not only the canonical one.
#[inline]
pub fn is_nan_bits(bits: u16) -> bool {
    bits & 0x7c00 == 0x7c00 && bits & 0x03ff != 0
}

/// Whether the bits encode positive or negative infinity.
#[inline]
pub fn is_infinite_bits(bits: u16) -> bool {
    bits & 0x7fff == HALF_POS_INFINITY
}

/// Compare two half values numerically.
/// Returns `None` if either is NaN. Positive and negative zero compare equal.
pub fn compare_half_bits(left: u16, right: u16) -> Option<Ordering> {
    f16::from_bits(left).partial_cmp(&f16::from_bits(right))
}

/// Convert all floats of the source slice into the target slice.
/// Both slices must have the same length.
pub fn floats_to_half_bits(source: &[f32], target: &mut [u16]) {
    debug_assert_eq!(source.len(), target.len(), "half conversion slice lengths");

    target.reinterpret_cast_mut::<f16>().convert_from_f32_slice(source);

    for (bits, &float) in target.iter_mut().zip(source) {
        if float.is_nan() { *bits = HALF_NAN; }
    }
}

/// Convert all half bits of the source slice into the target slice.
/// Both slices must have the same length.
pub fn half_bits_to_floats(source: &[u16], target: &mut [f32]) {
    debug_assert_eq!(source.len(), target.len(), "half conversion slice lengths");
    source.reinterpret_cast::<f16>().convert_to_f32_slice(target);
}
