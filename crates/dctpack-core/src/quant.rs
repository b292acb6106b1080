//! Fixed quantization of transform blocks.
//!
//! Both divisor matrices are constants of the container format. A decoder has
//! to use exactly the same values to scale coefficients back.

use crate::block::{Block, ChannelClass, BLOCK_WIDTH};

/// Divisors for the luminance channel, smallest at the low frequencies.
pub const LUMINANCE_DIVISORS: Block<u16> = [
    [2, 2, 2, 2, 3, 4, 5, 6],
    [2, 2, 2, 2, 3, 4, 5, 6],
    [2, 2, 2, 2, 4, 5, 7, 9],
    [2, 2, 2, 4, 5, 7, 9, 12],
    [3, 3, 4, 5, 8, 10, 12, 12],
    [4, 4, 5, 7, 10, 12, 12, 12],
    [5, 5, 7, 9, 12, 12, 12, 12],
    [6, 6, 9, 12, 12, 12, 12, 12],
];

/// Divisors for both chrominance channels.
pub const CHROMINANCE_DIVISORS: Block<u16> = [
    [3, 3, 5, 9, 13, 15, 15, 15],
    [3, 4, 6, 11, 14, 12, 12, 12],
    [5, 6, 9, 14, 12, 12, 12, 12],
    [9, 11, 14, 12, 12, 12, 12, 12],
    [13, 14, 12, 12, 12, 12, 12, 12],
    [15, 12, 12, 12, 12, 12, 12, 12],
    [15, 12, 12, 12, 12, 12, 12, 12],
    [15, 12, 12, 12, 12, 12, 12, 12],
];

pub fn divisors(class: ChannelClass) -> &'static Block<u16> {
    match class {
        ChannelClass::Luminance => &LUMINANCE_DIVISORS,
        ChannelClass::Chrominance => &CHROMINANCE_DIVISORS,
    }
}

/// Divide a coefficient block by the divisors of `class` and round every
/// quotient to the nearest integer, ties to even.
pub fn quantize(block: &Block<f32>, class: ChannelClass) -> Block<i32> {
    let divisors = divisors(class);
    let mut quantized = [[0; BLOCK_WIDTH]; BLOCK_WIDTH];

    for (row, out) in quantized.iter_mut().enumerate() {
        for (col, q) in out.iter_mut().enumerate() {
            let quotient = block[row][col] / f32::from(divisors[row][col]);
            *q = quotient.round_ties_even() as i32;
        }
    }

    quantized
}

/// Scale a quantized block back by the divisors of `class`.
pub fn dequantize(block: &Block<i32>, class: ChannelClass) -> Block<f32> {
    let divisors = divisors(class);
    let mut coefficients = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];

    for (row, out) in coefficients.iter_mut().enumerate() {
        for (col, c) in out.iter_mut().enumerate() {
            *c = (block[row][col] * i32::from(divisors[row][col])) as f32;
        }
    }

    coefficients
}
