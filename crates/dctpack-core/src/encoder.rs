//! The two-pass encoder.
//!
//! Pass 1 quantizes and linearizes every block of every channel and counts
//! the DC categories and AC symbols per table. The four code tables are built
//! from those counts, then pass 2 walks the very same blocks again and emits
//! the bits. All blocks stay in memory between the passes.

use std::path::Path;

use crate::bitstream::BitstreamWriter;
use crate::block::{Block, Channel, CoefficientVector, CHANNEL_COUNT};
use crate::container::{write_data_file, write_table_file, ImageGeometry};
use crate::error::{EncodeError, Result};
use crate::huffman::TableKey;
use crate::quant::quantize;
use crate::rle::run_length_encode;
use crate::tables::{CodeTables, FrequencyTables, TableKind};
use crate::value::{category, Value, MAX_CATEGORY};
use crate::zigzag::to_zigzag;

/// Transform-domain blocks of all three channels, in raster order.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    geometry: ImageGeometry,
    channels: [Vec<Block<f32>>; CHANNEL_COUNT],
}

impl TransformedImage {
    /// Every channel must hold exactly the blocks `geometry` asks for.
    pub fn new(geometry: ImageGeometry, channels: [Vec<Block<f32>>; CHANNEL_COUNT]) -> Result<Self> {
        for blocks in channels.iter() {
            check_geometry(geometry, blocks.len())?;
        }
        Ok(TransformedImage { geometry, channels })
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn channel(&self, channel: Channel) -> &[Block<f32>] {
        &self.channels[channel.index()]
    }

    /// Blocks per channel.
    pub fn block_count(&self) -> usize {
        self.channels[0].len()
    }
}

/// Quantized coefficient vectors, one `[Y, Cb, Cr]` triple per block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    pub(crate) geometry: ImageGeometry,
    pub(crate) blocks: Vec<[CoefficientVector; CHANNEL_COUNT]>,
}

impl QuantizedImage {
    pub fn new(geometry: ImageGeometry, blocks: Vec<[CoefficientVector; CHANNEL_COUNT]>) -> Result<Self> {
        check_geometry(geometry, blocks.len())?;
        Ok(QuantizedImage { geometry, blocks })
    }

    /// Quantize and zigzag every block of `image`.
    pub fn from_transformed(image: &TransformedImage) -> Self {
        let blocks = (0..image.block_count())
            .map(|index| {
                Channel::ALL.map(|channel| {
                    let block = &image.channel(channel)[index];
                    to_zigzag(&quantize(block, channel.class()))
                })
            })
            .collect();

        QuantizedImage {
            geometry: image.geometry,
            blocks,
        }
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn blocks(&self) -> &[[CoefficientVector; CHANNEL_COUNT]] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Output of the encoder, ready to be written into the container.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub geometry: ImageGeometry,
    pub block_count: u32,
    pub tables: CodeTables,
    pub payload: Vec<u8>,
}

impl EncodedImage {
    /// Write the table file and the data file.
    pub fn save(&self, table_path: &Path, data_path: &Path) -> Result<()> {
        write_table_file(table_path, self.geometry, &self.tables)?;
        write_data_file(data_path, self.block_count, &self.payload)
    }
}

/// Run the whole pipeline from transform-domain blocks.
pub fn encode(image: &TransformedImage) -> Result<EncodedImage> {
    encode_quantized(&QuantizedImage::from_transformed(image))
}

/// Run both passes over already quantized blocks.
pub fn encode_quantized(image: &QuantizedImage) -> Result<EncodedImage> {
    let block_count = u32::try_from(image.block_count()).map_err(|_| EncodeError::InvalidGeometry {
        width: image.geometry.width,
        height: image.geometry.height,
        blocks: image.block_count(),
    })?;

    let frequencies = collect_statistics(image)?;
    log::debug!(
        "statistics gathered over {} blocks of {}x{}",
        block_count,
        image.geometry.width,
        image.geometry.height
    );

    let tables = CodeTables::build(frequencies)?;
    let payload = emit(image, &tables)?;

    Ok(EncodedImage {
        geometry: image.geometry,
        block_count,
        tables,
        payload,
    })
}

/// Pass 1: count the DC categories and AC symbols of every table.
pub fn collect_statistics(image: &QuantizedImage) -> Result<FrequencyTables> {
    let mut frequencies = FrequencyTables::new();

    for block in image.blocks.iter() {
        for channel in Channel::ALL {
            let vector = &block[channel.index()];
            for &coefficient in vector.as_array() {
                checked_category(coefficient)?;
            }

            let class = channel.class();
            frequencies.observe(TableKind::dc(class), TableKey::Dc(category(vector.dc())));
            for (symbol, _) in run_length_encode(vector.ac()) {
                frequencies.observe(TableKind::ac(class), TableKey::Ac(symbol));
            }
        }
    }

    Ok(frequencies)
}

/// Pass 2: pack every block into one bit sequence.
pub fn emit(image: &QuantizedImage, tables: &CodeTables) -> Result<Vec<u8>> {
    let mut writer = BitstreamWriter::with_capacity(image.block_count() * CHANNEL_COUNT * 4);

    for (index, block) in image.blocks.iter().enumerate() {
        for channel in Channel::ALL {
            let vector = &block[channel.index()];
            for &coefficient in vector.ac() {
                checked_category(coefficient)?;
            }
            let class = channel.class();

            let dc = vector.dc();
            let dc_category = checked_category(dc)?;
            writer.write_code(tables.code(TableKind::dc(class), TableKey::Dc(dc_category))?)?;
            writer.write_value(Value::encode(dc))?;

            let pairs = run_length_encode(vector.ac());
            for &(symbol, value) in pairs.iter() {
                writer.write_code(tables.code(TableKind::ac(class), TableKey::Ac(symbol))?)?;
                writer.write_value(value)?;
            }

            log::trace!(
                "block {} {:?}: dc category {}, {} ac symbols",
                index,
                channel,
                dc_category,
                pairs.len()
            );
        }
    }

    log::debug!("emitted {} bits", writer.bits_written());
    let payload = writer.finish()?;
    log::debug!("payload is {} bytes", payload.len());
    Ok(payload)
}

fn checked_category(value: i32) -> Result<u8> {
    let category = category(value);
    if category > MAX_CATEGORY {
        return Err(EncodeError::CategoryOutOfRange { value, category });
    }
    Ok(category)
}

fn check_geometry(geometry: ImageGeometry, blocks: usize) -> Result<()> {
    if blocks != geometry.block_count() {
        return Err(EncodeError::InvalidGeometry {
            width: geometry.width,
            height: geometry.height,
            blocks,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{AC_LEN, BLOCK_WIDTH};
    use crate::rle::Symbol;

    fn zero_block() -> Block<f32> {
        [[0.0; BLOCK_WIDTH]; BLOCK_WIDTH]
    }

    fn single_block(dc: i32, ac: &[(usize, i32)]) -> QuantizedImage {
        let mut coefficients = [0; AC_LEN];
        for &(position, value) in ac {
            coefficients[position] = value;
        }
        let vector = CoefficientVector::from_parts(dc, &coefficients);
        QuantizedImage::new(ImageGeometry::new(8, 8), vec![[vector; CHANNEL_COUNT]]).unwrap()
    }

    #[test]
    fn test_rejects_block_count_mismatch() {
        let result = TransformedImage::new(
            ImageGeometry::new(16, 8),
            [vec![zero_block(); 2], vec![zero_block(); 2], vec![zero_block(); 1]],
        );
        assert!(matches!(
            result,
            Err(EncodeError::InvalidGeometry { blocks: 1, .. })
        ));
    }

    #[test]
    fn test_quantizes_per_channel_class() {
        let mut block = zero_block();
        block[0][0] = 12.0;
        let image = TransformedImage::new(
            ImageGeometry::new(8, 8),
            [vec![block], vec![block], vec![block]],
        )
        .unwrap();

        let quantized = QuantizedImage::from_transformed(&image);
        let [y, cb, cr] = quantized.blocks()[0];
        assert_eq!(y.dc(), 6);
        assert_eq!(cb.dc(), 4);
        assert_eq!(cr.dc(), 4);
    }

    #[test]
    fn test_statistics_count_every_channel() {
        let image = single_block(5, &[(9, 3)]);
        let frequencies = collect_statistics(&image).unwrap();

        assert_eq!(frequencies[TableKind::DcLuma].count(&TableKey::Dc(3)), 1);
        assert_eq!(frequencies[TableKind::DcChroma].count(&TableKey::Dc(3)), 2);
        assert_eq!(
            frequencies[TableKind::AcLuma].count(&TableKey::Ac(Symbol::new(9, 2))),
            1
        );
        assert_eq!(
            frequencies[TableKind::AcChroma].count(&TableKey::Ac(Symbol::END_OF_BLOCK)),
            2
        );
    }

    #[test]
    fn test_rejects_oversized_coefficient() {
        let image = single_block(2048, &[]);
        assert!(matches!(
            collect_statistics(&image),
            Err(EncodeError::CategoryOutOfRange {
                value: 2048,
                category: 12
            })
        ));
    }

    #[test]
    fn test_emission_with_foreign_tables_fails() {
        let tables = CodeTables::build(collect_statistics(&single_block(0, &[])).unwrap()).unwrap();
        let result = emit(&single_block(1, &[]), &tables);

        assert!(matches!(
            result,
            Err(EncodeError::InconsistentSymbolStatistics {
                table: TableKind::DcLuma,
                key: TableKey::Dc(1)
            })
        ));
    }

    #[test]
    fn test_all_zero_block_payload() {
        // every table holds a single key with code "0": three channels of
        // (dc "0", eob "0") make six zero bits
        let encoded = encode_quantized(&single_block(0, &[])).unwrap();
        assert_eq!(encoded.block_count, 1);
        assert_eq!(encoded.payload, vec![0]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let image = single_block(-7, &[(0, 3), (4, -1), (20, 12), (62, 1)]);
        let first = encode_quantized(&image).unwrap();
        let second = encode_quantized(&image).unwrap();

        assert_eq!(first.tables, second.tables);
        assert_eq!(first.payload, second.payload);
    }
}
