//! Magnitude categories and value bit patterns.
//!
//! A coefficient is written as its category (the number of bits of its
//! magnitude) followed by `category` bits. Positive values are written as is,
//! negative values as the one's complement of their magnitude, so the first
//! bit doubles as the sign.

use std::fmt;

/// Largest category a coefficient may have.
pub const MAX_CATEGORY: u8 = 10;

/// Minimum number of bits needed to represent the magnitude of `value`.
///
/// Zero has category 0. DC and AC coefficients share this function.
#[inline]
pub fn category(value: i32) -> u8 {
    (u32::BITS - value.unsigned_abs().leading_zeros()) as u8
}

/// The `category` bits that follow a code in the bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Value {
    bits: u32,
    len: u8,
}

impl Value {
    /// Zero-length value, written for category 0 symbols.
    pub const EMPTY: Value = Value { bits: 0, len: 0 };

    /// Compute the bit pattern for a coefficient.
    ///
    /// For negative values, bits = value + 2^size - 1 (the complement representation).
    pub fn encode(value: i32) -> Self {
        let len = category(value);
        if len == 0 {
            return Self::EMPTY;
        }

        let magnitude = value.unsigned_abs();
        let bits = if value < 0 {
            ((1u32 << len) - 1) - magnitude
        } else {
            magnitude
        };

        Value { bits, len }
    }

    /// Recover a coefficient from `category` bits. Inverse of [`Value::encode`].
    pub fn decode(bits: u32, category: u8) -> i32 {
        if category == 0 {
            return 0;
        }

        let threshold = 1u32 << (category - 1);
        if bits < threshold {
            bits as i32 - ((1i32 << category) - 1)
        } else {
            bits as i32
        }
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.bits, width = self.len as usize)
    }
}
