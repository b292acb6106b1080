//! Image acquisition and color conversion around the coefficient pipeline.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::block::{Block, Channel, BLOCK_WIDTH, CHANNEL_COUNT};
use crate::container::ImageGeometry;
use crate::encoder::TransformedImage;
use crate::error::{EncodeError, Result};
use crate::transform::Transform;

/// Offset that centers 8-bit samples around zero.
pub const LEVEL_SHIFT: f32 = 128.0;

/// One color channel of an image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl Plane {
    /// `samples` must hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        if width.checked_mul(height) != Some(samples.len()) {
            return Err(EncodeError::InvalidPlane {
                width,
                height,
                samples: samples.len(),
            });
        }

        Ok(Plane {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.samples[y * self.width + x]
    }

    /// Cut the plane into level-shifted 8x8 blocks in raster order.
    ///
    /// Positions beyond the right and bottom edge read as sample 0.
    pub fn to_blocks(&self) -> Vec<Block<f32>> {
        let blocks_wide = self.width.div_ceil(BLOCK_WIDTH);
        let blocks_high = self.height.div_ceil(BLOCK_WIDTH);
        let mut blocks = Vec::with_capacity(blocks_wide * blocks_high);

        for block_row in 0..blocks_high {
            for block_col in 0..blocks_wide {
                let mut block = [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH];
                for (row, samples) in block.iter_mut().enumerate() {
                    let y = block_row * BLOCK_WIDTH + row;
                    for (col, sample) in samples.iter_mut().enumerate() {
                        let x = block_col * BLOCK_WIDTH + col;
                        let value = if x < self.width && y < self.height {
                            self.get(x, y)
                        } else {
                            0
                        };
                        *sample = f32::from(value) - LEVEL_SHIFT;
                    }
                }
                blocks.push(block);
            }
        }

        blocks
    }

    /// Reassemble level-shifted blocks and crop the padding.
    ///
    /// `blocks` holds `geometry.block_count()` blocks in raster order.
    pub fn from_blocks(geometry: ImageGeometry, blocks: &[Block<f32>]) -> Self {
        let width = geometry.width as usize;
        let height = geometry.height as usize;
        let blocks_wide = geometry.blocks_wide();
        let mut samples = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let block = &blocks[(y / BLOCK_WIDTH) * blocks_wide + x / BLOCK_WIDTH];
                let value = block[y % BLOCK_WIDTH][x % BLOCK_WIDTH] + LEVEL_SHIFT;
                samples.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        Plane {
            width,
            height,
            samples,
        }
    }
}

/// JFIF full-range RGB to YCbCr.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168736 * r - 0.331264 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.418688 * g - 0.081312 * b + 128.0;

    (clamp_sample(y), clamp_sample(cb), clamp_sample(cr))
}

/// JFIF full-range YCbCr to RGB.
#[inline]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = f32::from(y);
    let cb = f32::from(cb) - 128.0;
    let cr = f32::from(cr) - 128.0;

    let r = y + 1.402 * cr;
    let g = y - 0.344136 * cb - 0.714136 * cr;
    let b = y + 1.772 * cb;

    (clamp_sample(r), clamp_sample(g), clamp_sample(b))
}

fn clamp_sample(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Open an image file and split it into Y, Cb and Cr planes.
pub fn load_image(path: &Path) -> Result<(ImageGeometry, [Plane; CHANNEL_COUNT])> {
    if !path.exists() {
        return Err(EncodeError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path)
        .map_err(EncodeError::InvalidImageMedia)?
        .to_rgb8();
    let geometry = ImageGeometry::new(image.width(), image.height());
    log::debug!(
        "loaded {} with {}x{} pixels",
        path.display(),
        geometry.width,
        geometry.height
    );

    Ok((geometry, split_planes(&image)))
}

/// Convert every pixel to YCbCr and separate the channels.
pub fn split_planes(image: &RgbImage) -> [Plane; CHANNEL_COUNT] {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut channels: [Vec<u8>; CHANNEL_COUNT] = Default::default();
    for samples in channels.iter_mut() {
        samples.reserve_exact(width * height);
    }

    for Rgb([r, g, b]) in image.pixels() {
        let (y, cb, cr) = rgb_to_ycbcr(*r, *g, *b);
        channels[Channel::Y.index()].push(y);
        channels[Channel::Cb.index()].push(cb);
        channels[Channel::Cr.index()].push(cr);
    }

    channels.map(|samples| Plane {
        width,
        height,
        samples,
    })
}

/// Inverse of [`split_planes`]. All planes must have the same size.
pub fn merge_planes(planes: &[Plane; CHANNEL_COUNT]) -> RgbImage {
    let [y, cb, cr] = planes;
    RgbImage::from_fn(y.width() as u32, y.height() as u32, |px, py| {
        let (px, py) = (px as usize, py as usize);
        let (r, g, b) = ycbcr_to_rgb(y.get(px, py), cb.get(px, py), cr.get(px, py));
        Rgb([r, g, b])
    })
}

/// Block and transform all three planes.
pub fn transform_planes<T: Transform>(
    geometry: ImageGeometry,
    planes: &[Plane; CHANNEL_COUNT],
    transform: &T,
) -> Result<TransformedImage> {
    let channels = planes.each_ref().map(|plane| {
        plane
            .to_blocks()
            .iter()
            .map(|block| transform.forward(block))
            .collect()
    });
    TransformedImage::new(geometry, channels)
}

/// Inverse transform the coefficient blocks of every channel back to planes.
pub fn restore_planes<T: Transform>(
    geometry: ImageGeometry,
    channels: &[Vec<Block<f32>>; CHANNEL_COUNT],
    transform: &T,
) -> [Plane; CHANNEL_COUNT] {
    channels.each_ref().map(|blocks| {
        let samples: Vec<Block<f32>> = blocks.iter().map(|block| transform.inverse(block)).collect();
        Plane::from_blocks(geometry, &samples)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Dct2;

    #[test]
    fn should_pad_with_zero_samples() {
        let plane = Plane::new(9, 1, vec![128; 9]).unwrap();
        let blocks = plane.to_blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0][0][0], 0.0);
        assert_eq!(blocks[0][1][0], -128.0);
        assert_eq!(blocks[1][0][0], 0.0);
        assert_eq!(blocks[1][0][1], -128.0);
    }

    #[test]
    fn should_reject_wrong_sample_count() {
        assert!(matches!(
            Plane::new(4, 2, vec![0; 7]),
            Err(EncodeError::InvalidPlane {
                width: 4,
                height: 2,
                samples: 7
            })
        ));
        assert!(Plane::new(4, 2, vec![0; 8]).is_ok());
    }

    #[test]
    fn should_keep_raster_order() {
        let samples = (0..16 * 16).map(|i| if i % 16 >= 8 { 200 } else { 10 }).collect();
        let plane = Plane::new(16, 16, samples).unwrap();
        let blocks = plane.to_blocks();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0][0][0], 10.0 - 128.0);
        assert_eq!(blocks[1][0][0], 200.0 - 128.0);
        assert_eq!(blocks[2][0][0], 10.0 - 128.0);
    }

    #[test]
    fn should_crop_when_reassembling() {
        let samples: Vec<u8> = (0..10 * 3).map(|i| i as u8).collect();
        let plane = Plane::new(10, 3, samples).unwrap();

        let restored = Plane::from_blocks(ImageGeometry::new(10, 3), &plane.to_blocks());
        assert_eq!(restored, plane);
    }

    #[test]
    fn should_convert_primary_colors() {
        assert_eq!(rgb_to_ycbcr(0, 0, 0), (0, 128, 128));
        assert_eq!(rgb_to_ycbcr(255, 255, 255), (255, 128, 128));
        assert_eq!(rgb_to_ycbcr(255, 0, 0), (76, 85, 255));
    }

    #[test]
    fn should_roughly_invert_color_conversion() {
        for &(r, g, b) in &[(12, 200, 99), (255, 0, 0), (40, 40, 40), (0, 0, 255)] {
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let (r2, g2, b2) = ycbcr_to_rgb(y, cb, cr);
            assert!((r as i32 - r2 as i32).abs() <= 2);
            assert!((g as i32 - g2 as i32).abs() <= 2);
            assert!((b as i32 - b2 as i32).abs() <= 2);
        }
    }

    #[test]
    fn should_split_and_merge_planes() {
        let image = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 40) as u8, (y * 50) as u8, 128]));
        let planes = split_planes(&image);
        assert_eq!(planes[0].width(), 5);
        assert_eq!(planes[2].height(), 4);

        let merged = merge_planes(&planes);
        for (a, b) in image.pixels().zip(merged.pixels()) {
            for channel in 0..3 {
                assert!((a[channel] as i32 - b[channel] as i32).abs() <= 2);
            }
        }
    }

    #[test]
    fn should_transform_and_restore_planes() {
        let geometry = ImageGeometry::new(12, 7);
        let plane = Plane::new(12, 7, (0..84).map(|i| (i * 3) as u8).collect()).unwrap();
        let planes = [plane.clone(), plane.clone(), plane.clone()];
        let dct = Dct2::new();

        let transformed = transform_planes(geometry, &planes, &dct).unwrap();
        assert_eq!(transformed.block_count(), 2);

        let channels = Channel::ALL.map(|channel| transformed.channel(channel).to_vec());
        let restored = restore_planes(geometry, &channels, &dct);
        assert_eq!(restored[0], plane);
    }
}
