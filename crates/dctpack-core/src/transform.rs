//! The spectral transform applied to level-shifted sample blocks.

use std::f32::consts::PI;

use crate::block::{Block, BLOCK_WIDTH};

/// A separable 8x8 transform and its inverse.
pub trait Transform {
    fn forward(&self, block: &Block<f32>) -> Block<f32>;

    fn inverse(&self, block: &Block<f32>) -> Block<f32>;
}

/// Orthonormal two-dimensional DCT-II.
///
/// `basis[u][x]` is `c(u) * cos((2x + 1) * u * pi / 16)` with `c(0) = sqrt(1/8)`
/// and `c(u) = 1/2` otherwise, so the inverse is the transposed product.
#[derive(Debug, Clone)]
pub struct Dct2 {
    basis: Block<f32>,
}

impl Dct2 {
    pub fn new() -> Self {
        let mut basis = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];

        for (u, row) in basis.iter_mut().enumerate() {
            let norm = if u == 0 { (1.0f32 / 8.0).sqrt() } else { 0.5 };
            for (x, b) in row.iter_mut().enumerate() {
                *b = norm * ((2.0 * x as f32 + 1.0) * u as f32 * PI / 16.0).cos();
            }
        }

        Dct2 { basis }
    }
}

impl Default for Dct2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Dct2 {
    /// `F = B * f * B^T`
    fn forward(&self, block: &Block<f32>) -> Block<f32> {
        let rows = multiply(&self.basis, block, false);
        multiply_transposed(&rows, &self.basis)
    }

    /// `f = B^T * F * B`
    fn inverse(&self, block: &Block<f32>) -> Block<f32> {
        let rows = multiply(&self.basis, block, true);
        multiply(&rows, &self.basis, false)
    }
}

/// `a * b`, or `a^T * b` when `transpose_a` is set.
fn multiply(a: &Block<f32>, b: &Block<f32>, transpose_a: bool) -> Block<f32> {
    let mut out = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, o) in row.iter_mut().enumerate() {
            *o = (0..BLOCK_WIDTH)
                .map(|k| {
                    let left = if transpose_a { a[k][i] } else { a[i][k] };
                    left * b[k][j]
                })
                .sum();
        }
    }
    out
}

/// `a * b^T`
fn multiply_transposed(a: &Block<f32>, b: &Block<f32>) -> Block<f32> {
    let mut out = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, o) in row.iter_mut().enumerate() {
            *o = (0..BLOCK_WIDTH).map(|k| a[i][k] * b[j][k]).sum();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Block<f32>, b: &Block<f32>, epsilon: f32) {
        for row in 0..BLOCK_WIDTH {
            for col in 0..BLOCK_WIDTH {
                assert!(
                    (a[row][col] - b[row][col]).abs() < epsilon,
                    "mismatch at ({}, {}): {} vs {}",
                    row,
                    col,
                    a[row][col],
                    b[row][col]
                );
            }
        }
    }

    #[test]
    fn test_constant_block_only_has_dc() {
        let block = [[-128.0; BLOCK_WIDTH]; BLOCK_WIDTH];
        let coefficients = Dct2::new().forward(&block);

        assert!((coefficients[0][0] + 1024.0).abs() < 1e-3);
        for row in 0..BLOCK_WIDTH {
            for col in 0..BLOCK_WIDTH {
                if (row, col) != (0, 0) {
                    assert!(coefficients[row][col].abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_inverse_restores_samples() {
        let dct = Dct2::new();
        let mut block = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];
        for (row, samples) in block.iter_mut().enumerate() {
            for (col, s) in samples.iter_mut().enumerate() {
                *s = ((row * 37 + col * 11) % 256) as f32 - 128.0;
            }
        }

        assert_close(&dct.inverse(&dct.forward(&block)), &block, 1e-2);
    }

    #[test]
    fn test_single_coefficient_is_a_basis_function() {
        let dct = Dct2::new();
        let mut coefficients = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];
        coefficients[0][1] = 1.0;

        let samples = dct.inverse(&coefficients);
        // constant along the rows, cosine along the columns
        assert!((samples[0][0] - samples[7][0]).abs() < 1e-5);
        assert!(samples[0][0] > 0.0);
        assert!(samples[0][7] < 0.0);
    }
}
