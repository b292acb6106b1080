//! Companion decoder for the table file plus data file container.

use std::path::Path;

use crate::bitstream::BitstreamReader;
use crate::block::{Block, Channel, ChannelClass, CoefficientVector, AC_LEN, CHANNEL_COUNT};
use crate::container::{read_data_file, read_table_file, ImageGeometry};
use crate::encoder::QuantizedImage;
use crate::error::DecodeError;
use crate::huffman::{CodeLookup, TableKey};
use crate::quant::dequantize;
use crate::rle::{run_length_decode, Symbol};
use crate::tables::{CodeTables, TableKind};
use crate::zigzag::from_zigzag;

type Result<T> = std::result::Result<T, DecodeError>;

/// Every channel of a block carries at least a DC code and an end-of-block
/// code of one bit each.
const MIN_BLOCK_BITS: u64 = 2 * CHANNEL_COUNT as u64;

/// Read both container files and decode the payload.
pub fn decode_files(table_path: &Path, data_path: &Path) -> Result<QuantizedImage> {
    let (geometry, tables) = read_table_file(table_path)?;
    let (block_count, payload) = read_data_file(data_path)?;
    decode(geometry, &tables, block_count, &payload)
}

/// Recover the quantized coefficient vectors of every block.
///
/// Bits left over after the last block are the zero padding of the final
/// byte and are ignored.
pub fn decode(
    geometry: ImageGeometry,
    tables: &CodeTables,
    block_count: u32,
    payload: &[u8],
) -> Result<QuantizedImage> {
    let expected = geometry.block_count();
    if block_count as usize != expected {
        return Err(DecodeError::BlockCountMismatch {
            expected,
            found: block_count as usize,
        });
    }

    if (expected as u64).saturating_mul(MIN_BLOCK_BITS) > payload.len() as u64 * 8 {
        return Err(DecodeError::TruncatedPayload);
    }

    let lookups = TableKind::ALL.map(|kind| tables[kind].lookup());
    let mut reader = BitstreamReader::new(payload);
    let mut blocks = Vec::new();

    for index in 0..expected {
        let mut block = [CoefficientVector::default(); CHANNEL_COUNT];
        for channel in Channel::ALL {
            block[channel.index()] = decode_vector(&mut reader, channel.class(), &lookups)?;
        }
        log::trace!("block {} decoded up to bit {}", index, reader.position());
        blocks.push(block);
    }

    log::debug!(
        "decoded {} blocks from {} payload bytes",
        blocks.len(),
        payload.len()
    );
    Ok(QuantizedImage { geometry, blocks })
}

fn decode_vector(
    reader: &mut BitstreamReader<'_>,
    class: ChannelClass,
    lookups: &[CodeLookup; 4],
) -> Result<CoefficientVector> {
    let dc_table = TableKind::dc(class);
    let dc = match reader.read_key(dc_table, &lookups[dc_table.index()])? {
        TableKey::Dc(category) => reader.read_value(category)?,
        key => return Err(DecodeError::UnexpectedKey { table: dc_table, key }),
    };

    let ac_table = TableKind::ac(class);
    let mut pairs = Vec::new();
    let mut filled = 0usize;
    loop {
        let symbol = match reader.read_key(ac_table, &lookups[ac_table.index()])? {
            TableKey::Ac(symbol) => symbol,
            key => return Err(DecodeError::UnexpectedKey { table: ac_table, key }),
        };
        pairs.push((symbol, reader.read_value(symbol.category)?));

        if symbol == Symbol::END_OF_BLOCK {
            break;
        }
        filled += usize::from(symbol.run) + 1;
        if filled > AC_LEN {
            return Err(DecodeError::AcOverrun);
        }
    }

    let ac = run_length_decode(&pairs)?;
    Ok(CoefficientVector::from_parts(dc, &ac))
}

/// Undo zigzag and quantization, giving back one list of blocks per channel.
pub fn reconstruct_coefficients(image: &QuantizedImage) -> [Vec<Block<f32>>; CHANNEL_COUNT] {
    Channel::ALL.map(|channel| {
        image
            .blocks
            .iter()
            .map(|block| dequantize(&from_zigzag(&block[channel.index()]), channel.class()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_quantized;
    use crate::huffman::{Code, CodeTable};

    fn vector(dc: i32, ac: &[(usize, i32)]) -> CoefficientVector {
        let mut coefficients = [0; AC_LEN];
        for &(position, value) in ac {
            coefficients[position] = value;
        }
        CoefficientVector::from_parts(dc, &coefficients)
    }

    fn sample_image() -> QuantizedImage {
        let blocks = vec![
            [
                vector(5, &[(9, 3)]),
                vector(-2, &[]),
                vector(0, &[(0, 1), (1, -1)]),
            ],
            [
                vector(-511, &[(17, 4), (40, -9)]),
                vector(3, &[(62, 1)]),
                vector(1, &[(15, 2)]),
            ],
        ];
        QuantizedImage::new(ImageGeometry::new(16, 3), blocks).unwrap()
    }

    #[test]
    fn test_decode_inverts_encode() {
        let image = sample_image();
        let encoded = encode_quantized(&image).unwrap();

        let decoded = decode(
            encoded.geometry,
            &encoded.tables,
            encoded.block_count,
            &encoded.payload,
        )
        .unwrap();

        assert_eq!(decoded, image);
    }

    #[test]
    fn test_block_count_must_match_geometry() {
        let encoded = encode_quantized(&sample_image()).unwrap();
        let result = decode(encoded.geometry, &encoded.tables, 3, &encoded.payload);

        assert!(matches!(
            result,
            Err(DecodeError::BlockCountMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let encoded = encode_quantized(&sample_image()).unwrap();
        let short = &encoded.payload[..encoded.payload.len() / 2];

        assert!(matches!(
            decode(encoded.geometry, &encoded.tables, encoded.block_count, short),
            Err(DecodeError::TruncatedPayload)
        ));
    }

    #[test]
    fn test_block_count_beyond_payload_is_truncated() {
        let geometry = ImageGeometry::new(8 * 65535, 8 * 65535);
        assert_eq!(geometry.block_count(), 4_294_836_225);

        assert!(matches!(
            decode(geometry, &CodeTables::default(), 4_294_836_225, &[0; 4]),
            Err(DecodeError::TruncatedPayload)
        ));
    }

    #[test]
    fn test_endless_zero_runs_overrun() {
        let dc: CodeTable = vec![(TableKey::Dc(0), Code::new(0, 1))].into_iter().collect();
        let ac: CodeTable = vec![
            (TableKey::Ac(Symbol::END_OF_BLOCK), Code::new(0, 1)),
            (TableKey::Ac(Symbol::ZERO_RUN), Code::new(1, 1)),
        ]
        .into_iter()
        .collect();
        let tables = CodeTables::from_tables([dc, ac, CodeTable::default(), CodeTable::default()]);

        // dc "0", then ZRL after ZRL
        let payload = [0b0111_1111, 0xFF, 0xFF];
        assert!(matches!(
            decode(ImageGeometry::new(8, 8), &tables, 1, &payload),
            Err(DecodeError::AcOverrun)
        ));
    }

    #[test]
    fn test_reconstruct_dequantizes() {
        let image = QuantizedImage::new(
            ImageGeometry::new(8, 8),
            vec![[vector(5, &[(0, 1)]), vector(2, &[]), vector(-1, &[])]],
        )
        .unwrap();

        let [y, cb, cr] = reconstruct_coefficients(&image);
        assert_eq!(y[0][0][0], 10.0);
        // zigzag position 1 is row 0, column 1
        assert_eq!(y[0][0][1], 2.0);
        assert_eq!(cb[0][0][0], 6.0);
        assert_eq!(cr[0][0][0], -3.0);
    }
}
