//! Container persistence: the text table file and the binary data file.
//!
//! Table file layout, one item per line:
//!
//! ```text
//! <width>,<height>
//! <entry count of dc_y>
//! <category>          \
//! <code>              / repeated per entry
//! <entry count of ac_y>
//! <run>,<category>    \
//! <code>              / repeated per entry
//! ... dc_c, ac_c
//! ```
//!
//! Data file layout: a 4-byte big-endian block count, followed by the packed
//! payload.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::block::BLOCK_WIDTH;
use crate::error::{DecodeError, EncodeError, Result};
use crate::huffman::{Code, CodeTable, TableKey};
use crate::rle::{Symbol, MAX_RUN};
use crate::tables::{CodeTables, TableKind};
use crate::value::MAX_CATEGORY;

/// Image dimensions as recorded in the table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        ImageGeometry { width, height }
    }

    pub fn blocks_wide(&self) -> usize {
        (self.width as usize).div_ceil(BLOCK_WIDTH)
    }

    pub fn blocks_high(&self) -> usize {
        (self.height as usize).div_ceil(BLOCK_WIDTH)
    }

    /// Blocks per channel.
    pub fn block_count(&self) -> usize {
        self.blocks_wide() * self.blocks_high()
    }

    pub fn padded_width(&self) -> usize {
        self.blocks_wide() * BLOCK_WIDTH
    }

    pub fn padded_height(&self) -> usize {
        self.blocks_high() * BLOCK_WIDTH
    }
}

/// Render the table file.
pub fn format_table_file(geometry: ImageGeometry, tables: &CodeTables) -> String {
    let mut out = format!("{},{}\n", geometry.width, geometry.height);
    for (_, table) in tables.iter() {
        out.push_str(&format!("{}\n", table.len()));
        for (key, code) in table.iter() {
            out.push_str(&format!("{}\n{}\n", key, code));
        }
    }
    out
}

pub fn write_table_file(path: &Path, geometry: ImageGeometry, tables: &CodeTables) -> Result<()> {
    let mut writer = BufWriter::new(create(path)?);
    writer
        .write_all(format_table_file(geometry, tables).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|source| write_error(path, source))?;

    log::debug!("table file written to {}", path.display());
    Ok(())
}

pub fn write_data_file(path: &Path, block_count: u32, payload: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(create(path)?);
    writer
        .write_u32::<BigEndian>(block_count)
        .and_then(|_| writer.write_all(payload))
        .and_then(|_| writer.flush())
        .map_err(|source| write_error(path, source))?;

    log::debug!(
        "data file written to {}: {} blocks, {} payload bytes",
        path.display(),
        block_count,
        payload.len()
    );
    Ok(())
}

pub fn read_table_file(path: &Path) -> std::result::Result<(ImageGeometry, CodeTables), DecodeError> {
    let text = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    parse_table_file(&text)
}

/// Read the block count header and the payload behind it.
pub fn read_data_file(path: &Path) -> std::result::Result<(u32, Vec<u8>), DecodeError> {
    let data = fs::read(path).map_err(|source| read_error(path, source))?;
    split_data(&data)
}

/// Split a data file into its block count and payload.
pub fn split_data(data: &[u8]) -> std::result::Result<(u32, Vec<u8>), DecodeError> {
    let mut header = data;
    let block_count = header
        .read_u32::<BigEndian>()
        .map_err(|_| DecodeError::MissingHeader)?;
    Ok((block_count, header.to_vec()))
}

/// Parse a table file back into geometry and code tables.
pub fn parse_table_file(text: &str) -> std::result::Result<(ImageGeometry, CodeTables), DecodeError> {
    let mut lines = Lines::new(text);

    let (line, size) = lines.next("image size")?;
    let geometry = match parse_pair(size) {
        Some((width, height)) => ImageGeometry::new(width, height),
        None => return Err(malformed(line, format!("expected <width>,<height>, got {:?}", size))),
    };

    let mut tables: [CodeTable; 4] = Default::default();
    for (slot, kind) in tables.iter_mut().zip(TableKind::ALL) {
        let (count_line, count) = lines.next("entry count")?;
        let count: usize = count.trim().parse().map_err(|_| {
            malformed(count_line, format!("invalid entry count {:?} for {}", count, kind))
        })?;
        // each entry takes a key line and a code line
        if count > lines.remaining() / 2 {
            return Err(malformed(
                count_line,
                format!(
                    "entry count {} for {} exceeds the {} lines left",
                    count,
                    kind,
                    lines.remaining()
                ),
            ));
        }

        let mut entries: BTreeMap<TableKey, Code> = BTreeMap::new();
        for _ in 0..count {
            let (key_line, key) = lines.next("table key")?;
            let key = parse_key(kind, key).ok_or_else(|| {
                malformed(key_line, format!("invalid key {:?} for table {}", key, kind))
            })?;
            if entries.contains_key(&key) {
                return Err(malformed(key_line, format!("duplicate key {} in table {}", key, kind)));
            }

            let (code_line, code) = lines.next("code")?;
            let code = Code::from_bit_str(code.trim())
                .ok_or_else(|| malformed(code_line, format!("invalid code {:?}", code)))?;
            if let Some(other) = entries
                .values()
                .find(|other| other.is_prefix_of(&code) || code.is_prefix_of(other))
            {
                return Err(malformed(
                    code_line,
                    format!("code {} conflicts with {} in table {}", code, other, kind),
                ));
            }

            entries.insert(key, code);
        }

        *slot = entries.into_iter().collect();
    }

    Ok((geometry, CodeTables::from_tables(tables)))
}

fn parse_key(kind: TableKind, s: &str) -> Option<TableKey> {
    let s = s.trim();
    if kind.is_dc() {
        let category: u8 = s.parse().ok()?;
        (category <= MAX_CATEGORY).then_some(TableKey::Dc(category))
    } else {
        let (run, category) = parse_pair(s)?;
        let (run, category) = (u8::try_from(run).ok()?, u8::try_from(category).ok()?);
        (run <= MAX_RUN && category <= MAX_CATEGORY)
            .then_some(TableKey::Ac(Symbol::new(run, category)))
    }
}

fn parse_pair(s: &str) -> Option<(u32, u32)> {
    let (left, right) = s.trim().split_once(',')?;
    Some((left.trim().parse().ok()?, right.trim().parse().ok()?))
}

/// Line iterator that knows the 1-based line number.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
    total: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            last: 0,
            total: text.lines().count(),
        }
    }

    fn remaining(&self) -> usize {
        self.total - self.last
    }

    fn next(&mut self, expected: &str) -> std::result::Result<(usize, &'a str), DecodeError> {
        match self.inner.next() {
            Some((index, line)) => {
                self.last = index + 1;
                Ok((self.last, line))
            }
            None => Err(malformed(
                self.last + 1,
                format!("unexpected end of file, expected {}", expected),
            )),
        }
    }
}

fn malformed(line: usize, reason: String) -> DecodeError {
    DecodeError::MalformedTableFile { line, reason }
}

/// Create `path`, reporting a missing parent directory as `PathNotFound`.
fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => EncodeError::PathNotFound {
            path: parent_dir(path),
        },
        _ => write_error(path, source),
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

fn write_error(path: &Path, source: io::Error) -> EncodeError {
    EncodeError::WriteError {
        path: path.to_path_buf(),
        source,
    }
}

fn read_error(path: &Path, source: io::Error) -> DecodeError {
    match source.kind() {
        io::ErrorKind::NotFound => DecodeError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => DecodeError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    }
}
