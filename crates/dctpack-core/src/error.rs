use std::path::PathBuf;

use thiserror::Error;

use crate::huffman::TableKey;
use crate::tables::TableKind;
use crate::value::MAX_CATEGORY;

/// Result type for the encoding direction.
pub type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Error, Debug)]
pub enum EncodeError {
    /// An input file or the directory an output file should go into does not exist
    #[error("No such file or directory: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// A symbol reached the emission pass that the statistics pass never saw.
    /// Both passes walk the same blocks, so this is always a bug.
    #[error("Symbol {key} of table {table} was not observed while gathering statistics")]
    InconsistentSymbolStatistics { table: TableKind, key: TableKey },

    /// A quantized coefficient is too large for the category alphabet
    #[error("Coefficient {value} needs {category} bits but at most {max} are supported", max = MAX_CATEGORY)]
    CategoryOutOfRange { value: i32, category: u8 },

    /// A Huffman code got longer than the code representation can hold
    #[error("Huffman code of table {table} would be {length} bits long")]
    CodeTooLong { table: TableKind, length: usize },

    /// Block counts of the channels do not match the image geometry
    #[error("Image of {width}x{height} does not fit {blocks} blocks per channel")]
    InvalidGeometry {
        width: u32,
        height: u32,
        blocks: usize,
    },

    /// Represents a failure to write a container file.
    #[error("Write error on {}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error without a file to attribute it to, such as a failed
    /// flush of the in-memory bit writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sample plane was constructed with a buffer of the wrong length
    #[error("Plane of {width}x{height} cannot hold {samples} samples")]
    InvalidPlane {
        width: usize,
        height: usize,
        samples: usize,
    },

    /// Represents an image that could not be read. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia(#[source] image::ImageError),

    #[error("API Error: Missing image")]
    MissingImage,

    #[error("API Error: Missing output file")]
    MissingOutput,
}

#[derive(Error, Debug)]
pub enum DecodeError {
    /// A container file to read does not exist
    #[error("No such file: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// Represents a failure to read from input.
    #[error("Read error on {}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed table file at line {line}: {reason}")]
    MalformedTableFile { line: usize, reason: String },

    #[error("Data file is too short to hold the block count header")]
    MissingHeader,

    #[error("Data file holds {found} blocks but the image geometry needs {expected}")]
    BlockCountMismatch { expected: usize, found: usize },

    #[error("No code of table {table} matches the payload at bit {position}")]
    UnknownCode { table: TableKind, position: u64 },

    #[error("Key {key} does not belong into table {table}")]
    UnexpectedKey { table: TableKind, key: TableKey },

    #[error("Payload ended before all blocks were decoded")]
    TruncatedPayload,

    #[error("Run-length pairs overrun the AC coefficients of a block")]
    AcOverrun,

    /// Represents a failure when writing the reconstructed image.
    #[error("Image encoding error")]
    ImageEncodingError(#[source] image::ImageError),

    #[error("API Error: Missing input file")]
    MissingInput,

    #[error("API Error: Missing output file")]
    MissingOutput,
}
