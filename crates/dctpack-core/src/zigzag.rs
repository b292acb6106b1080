//! Zigzag linearization of quantized blocks.
//!
//! The diagonal scan puts the low frequencies first, so the zeros that the
//! quantizer produces at high frequencies end up as one trailing run.

use crate::block::{Block, CoefficientVector, BLOCK_LEN, BLOCK_WIDTH};

/// Zigzag order to natural (row-major) order mapping.
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_LEN] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Natural (row-major) order to zigzag order mapping.
pub const NATURAL_TO_ZIGZAG: [usize; BLOCK_LEN] = [
    0, 1, 5, 6, 14, 15, 27, 28, 2, 4, 7, 13, 16, 26, 29, 42, 3, 8, 12, 17, 25, 30, 41, 43, 9, 11,
    18, 24, 31, 40, 44, 53, 10, 19, 23, 32, 39, 45, 52, 54, 20, 22, 33, 38, 46, 51, 55, 60, 21, 34,
    37, 47, 50, 56, 59, 61, 35, 36, 48, 49, 57, 58, 62, 63,
];

/// Linearize a quantized block in zigzag order.
pub fn to_zigzag(block: &Block<i32>) -> CoefficientVector {
    let mut coefficients = [0; BLOCK_LEN];
    for (row, values) in block.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            coefficients[NATURAL_TO_ZIGZAG[row * BLOCK_WIDTH + col]] = value;
        }
    }
    CoefficientVector::new(coefficients)
}

/// Rebuild the 8x8 block from a zigzag ordered vector.
pub fn from_zigzag(vector: &CoefficientVector) -> Block<i32> {
    let mut block = [[0; BLOCK_WIDTH]; BLOCK_WIDTH];
    for (zigzag, &value) in vector.as_array().iter().enumerate() {
        let natural = ZIGZAG_TO_NATURAL[zigzag];
        block[natural / BLOCK_WIDTH][natural % BLOCK_WIDTH] = value;
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_tables_are_inverse() {
        assert_eq!(ZIGZAG_TO_NATURAL[0], 0);
        assert_eq!(NATURAL_TO_ZIGZAG[0], 0);

        for i in 0..BLOCK_LEN {
            assert_eq!(NATURAL_TO_ZIGZAG[ZIGZAG_TO_NATURAL[i]], i);
            assert_eq!(ZIGZAG_TO_NATURAL[NATURAL_TO_ZIGZAG[i]], i);
        }
    }

    #[test]
    fn test_scan_order_is_a_bijection() {
        let mut seen = [false; BLOCK_LEN];
        for &position in NATURAL_TO_ZIGZAG.iter() {
            assert!(!seen[position], "position {} visited twice", position);
            seen[position] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_scan_starts_with_the_diagonals() {
        let mut block = [[0; 8]; 8];
        for (row, values) in block.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (row * 8 + col) as i32;
            }
        }

        let v = to_zigzag(&block);
        // (0,0), (0,1), (1,0), (2,0), (1,1), (0,2)
        assert_eq!(&v.as_array()[..6], &[0, 1, 8, 16, 9, 2]);
        assert_eq!(v.as_array()[63], 63);
    }

    #[test]
    fn test_zigzag_roundtrip() {
        let mut block = [[0; 8]; 8];
        for (row, values) in block.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (row as i32 - 4) * 31 + col as i32 * 7;
            }
        }

        assert_eq!(from_zigzag(&to_zigzag(&block)), block);
    }
}
