//! Bit packing of the entropy-coded payload.
//!
//! Bits are packed most significant bit first into one continuous stream with
//! no alignment between blocks or channels. Only the final byte is padded,
//! with zero bits.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::DecodeError;
use crate::huffman::{Code, CodeLookup, TableKey};
use crate::tables::TableKind;
use crate::value::Value;

/// In-memory writer for the whole payload of one image.
pub struct BitstreamWriter {
    writer: BitWriter<Vec<u8>, BigEndian>,
    bits_written: u64,
}

impl BitstreamWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BitstreamWriter {
            writer: BitWriter::endian(Vec::with_capacity(capacity), BigEndian),
            bits_written: 0,
        }
    }

    #[inline]
    pub fn write_code(&mut self, code: Code) -> io::Result<()> {
        self.writer.write(u32::from(code.len()), code.bits())?;
        self.bits_written += u64::from(code.len());
        Ok(())
    }

    #[inline]
    pub fn write_value(&mut self, value: Value) -> io::Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.writer.write(u32::from(value.len()), value.bits())?;
        self.bits_written += u64::from(value.len());
        Ok(())
    }

    /// Number of bits written so far, without padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the last byte with zero bits and hand out the packed bytes.
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        self.writer.byte_align()?;
        Ok(self.writer.into_writer())
    }
}

impl Default for BitstreamWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader over a packed payload, resolving codes by prefix lookup.
pub struct BitstreamReader<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    position: u64,
}

impl<'a> BitstreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitstreamReader {
            reader: BitReader::endian(data, BigEndian),
            position: 0,
        }
    }

    /// Bit offset of the next read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read bits until they form a code of `lookup`.
    pub fn read_key(&mut self, table: TableKind, lookup: &CodeLookup) -> Result<TableKey, DecodeError> {
        let start = self.position;
        let mut code = Code::empty();

        while code.len() < lookup.max_len() {
            code = code.push(self.read_bit()?);
            if let Some(key) = lookup.get(&code) {
                return Ok(key);
            }
        }

        Err(DecodeError::UnknownCode {
            table,
            position: start,
        })
    }

    /// Read the `category` value bits and sign-extend them.
    pub fn read_value(&mut self, category: u8) -> Result<i32, DecodeError> {
        if category == 0 {
            return Ok(0);
        }
        let bits: u32 = self
            .reader
            .read(u32::from(category))
            .map_err(truncated)?;
        self.position += u64::from(category);
        Ok(Value::decode(bits, category))
    }

    fn read_bit(&mut self) -> Result<bool, DecodeError> {
        let bit = self.reader.read_bit().map_err(truncated)?;
        self.position += 1;
        Ok(bit)
    }
}

fn truncated(_: io::Error) -> DecodeError {
    DecodeError::TruncatedPayload
}
