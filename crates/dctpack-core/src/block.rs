//! Block level data types shared by every stage of the pipeline.

/// Width and height of one block.
pub const BLOCK_WIDTH: usize = 8;

/// Number of coefficients in one block.
pub const BLOCK_LEN: usize = BLOCK_WIDTH * BLOCK_WIDTH;

/// Number of AC coefficients in one block.
pub const AC_LEN: usize = BLOCK_LEN - 1;

/// Number of color channels every image carries (Y, Cb, Cr).
pub const CHANNEL_COUNT: usize = 3;

/// An 8x8 matrix, indexed `[row][col]`.
///
/// Holds reals before quantization and integers after.
pub type Block<T> = [[T; BLOCK_WIDTH]; BLOCK_WIDTH];

/// Selects which quantization divisors and which pair of code tables a
/// channel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelClass {
    Luminance,
    Chrominance,
}

/// The three channels in the order they are emitted for every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Y,
    Cb,
    Cr,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Y, Channel::Cb, Channel::Cr];

    pub fn class(self) -> ChannelClass {
        match self {
            Channel::Y => ChannelClass::Luminance,
            Channel::Cb | Channel::Cr => ChannelClass::Chrominance,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The 64 quantized coefficients of one block in zigzag order.
///
/// Element 0 is the DC coefficient, elements 1 to 63 are the AC coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientVector([i32; BLOCK_LEN]);

impl CoefficientVector {
    pub fn new(coefficients: [i32; BLOCK_LEN]) -> Self {
        Self(coefficients)
    }

    /// Assemble a vector from its DC coefficient and its 63 AC coefficients.
    pub fn from_parts(dc: i32, ac: &[i32; AC_LEN]) -> Self {
        let mut coefficients = [0; BLOCK_LEN];
        coefficients[0] = dc;
        coefficients[1..].copy_from_slice(ac);
        Self(coefficients)
    }

    #[inline]
    pub fn dc(&self) -> i32 {
        self.0[0]
    }

    #[inline]
    pub fn ac(&self) -> &[i32] {
        &self.0[1..]
    }

    #[inline]
    pub fn as_array(&self) -> &[i32; BLOCK_LEN] {
        &self.0
    }
}

impl Default for CoefficientVector {
    fn default() -> Self {
        Self([0; BLOCK_LEN])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_split_dc_from_ac() {
        let mut ac = [0; AC_LEN];
        ac[0] = 7;
        ac[62] = -3;
        let v = CoefficientVector::from_parts(12, &ac);

        assert_eq!(v.dc(), 12);
        assert_eq!(v.ac().len(), AC_LEN);
        assert_eq!(v.ac()[0], 7);
        assert_eq!(v.as_array()[63], -3);
    }

    #[test]
    fn should_map_channels_to_classes() {
        assert_eq!(Channel::Y.class(), ChannelClass::Luminance);
        assert_eq!(Channel::Cb.class(), ChannelClass::Chrominance);
        assert_eq!(Channel::Cr.class(), ChannelClass::Chrominance);
        assert_eq!(Channel::Cr.index(), 2);
    }
}
