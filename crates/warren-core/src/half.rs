//! 16-bit floating-point register value (1 sign, 5 exponent, 10 fraction bits).
//!
//! Registers are plain `u16`; `Half` gives those bits a numeric meaning.
//! Arithmetic promotes to `f32`, computes, and demotes back, so results are
//! rounded to half precision at every instruction boundary.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

const SIGN_MASK: u16 = 0x8000;
const EXPONENT_MASK: u16 = 0x7C00;
const FRACTION_MASK: u16 = 0x03FF;

/// A half-precision floating-point value stored as its raw bit pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct Half(u16);

impl Half {
    /// Smallest positive (subnormal) value.
    pub const EPSILON: Half = Half(0x0001);
    /// Largest finite value.
    pub const MAX: Half = Half(0x7BFF);
    /// Smallest finite value.
    pub const MIN: Half = Half(0xFBFF);
    pub const NAN: Half = Half(0x7C01);
    pub const INFINITY: Half = Half(0x7C00);
    pub const NEG_INFINITY: Half = Half(0xFC00);

    /// Reinterpret a raw 16-bit pattern as a half-precision value.
    pub const fn from_bits(bits: u16) -> Self {
        Half(bits)
    }

    /// The raw 16-bit pattern.
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Widen to `f32`. Exact: every half value is representable.
    pub fn to_f32(self) -> f32 {
        let sign = (self.0 & SIGN_MASK) != 0;
        let exponent = (self.0 & EXPONENT_MASK) >> 10;
        let fraction = self.0 & FRACTION_MASK;

        match exponent {
            0x00 => {
                if fraction == 0 {
                    // Signed zero
                    compose_f32(sign, 0, 0)
                } else {
                    subnormal_to_f32(sign, fraction)
                }
            }
            0x1F => {
                if fraction == 0 {
                    if sign { f32::NEG_INFINITY } else { f32::INFINITY }
                } else {
                    f32::NAN
                }
            }
            _ => compose_f32(sign, exponent as i32 - 15 + 127, (fraction as u32) << 13),
        }
    }

    /// Narrow from `f32`, truncating excess fraction bits.
    ///
    /// Subnormal and out-of-range inputs collapse to signed zero; infinities
    /// and NaN map to their half-precision encodings.
    pub fn from_f32(value: f32) -> Self {
        if value == 0.0 {
            return if value.is_sign_negative() { Half(0x8000) } else { Half(0x0000) };
        }
        if value == f32::INFINITY {
            return Half::INFINITY;
        }
        if value == f32::NEG_INFINITY {
            return Half::NEG_INFINITY;
        }
        if value.is_nan() {
            return Half::NAN;
        }
        if value.is_subnormal() {
            return if value.is_sign_negative() { Half(0x8000) } else { Half(0x0000) };
        }

        from_normal_f32(value)
    }
}

/// Build an `f32` from sign, biased exponent and a 23-bit fraction.
fn compose_f32(sign: bool, exponent: i32, fraction: u32) -> f32 {
    let mut bits = ((exponent as u32) << 23) | fraction;
    if sign {
        bits |= 0x8000_0000;
    }
    f32::from_bits(bits)
}

/// Decode a subnormal half (biased exponent 0, fraction != 0).
///
/// Normalizes the fraction: shift left until the leading 1 falls off the
/// 10-bit field, and fold the shift count into the f32 exponent.
fn subnormal_to_f32(sign: bool, fraction: u16) -> f32 {
    // leading_zeros is over 16 bits; a 10-bit fraction always has >= 6.
    let shift = fraction.leading_zeros() as i32 - 5;
    let normalized = ((fraction as u32) << shift) & FRACTION_MASK as u32;
    let exponent = 127 - shift - 14;
    compose_f32(sign, exponent, normalized << 13)
}

/// Encode a normal, nonzero, finite `f32`.
fn from_normal_f32(value: f32) -> Half {
    let bits = value.to_bits();
    let sign = if (bits & 0x8000_0000) != 0 { SIGN_MASK } else { 0 };
    let exponent = ((bits >> 23) & 0xFF) as i32 - 127;
    let fraction = bits & 0x007F_FFFF;

    if (-14..=15).contains(&exponent) {
        // Fits as a normal half
        let biased = (exponent + 15) as u16;
        Half(sign | biased << 10 | (fraction >> 13) as u16)
    } else if (-24..=-15).contains(&exponent) {
        // Fits as a subnormal half: shift the implicit leading 1 into the fraction
        let shift = -(exponent + 14);
        Half(sign | ((fraction | 0x0080_0000) >> (13 + shift)) as u16)
    } else {
        // Out of range either way: signed zero
        Half(sign)
    }
}

impl From<f32> for Half {
    fn from(value: f32) -> Self {
        Half::from_f32(value)
    }
}

impl From<Half> for f32 {
    fn from(value: Half) -> Self {
        value.to_f32()
    }
}

impl PartialEq for Half {
    fn eq(&self, other: &Self) -> bool {
        self.to_f32() == other.to_f32()
    }
}

impl PartialOrd for Half {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl Add for Half {
    type Output = Half;
    fn add(self, rhs: Half) -> Half {
        Half::from_f32(self.to_f32() + rhs.to_f32())
    }
}

impl Sub for Half {
    type Output = Half;
    fn sub(self, rhs: Half) -> Half {
        Half::from_f32(self.to_f32() - rhs.to_f32())
    }
}

impl Mul for Half {
    type Output = Half;
    fn mul(self, rhs: Half) -> Half {
        Half::from_f32(self.to_f32() * rhs.to_f32())
    }
}

impl Div for Half {
    type Output = Half;
    fn div(self, rhs: Half) -> Half {
        Half::from_f32(self.to_f32() / rhs.to_f32())
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
