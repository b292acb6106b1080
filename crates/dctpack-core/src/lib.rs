//! # dctpack core
//!
//! Entropy coding stage of a lossy still-image encoder. Transform-domain 8x8
//! blocks of the Y, Cb and Cr channels are
//! - quantized with a fixed luminance or chrominance matrix ([`quant`])
//! - linearized in zigzag order ([`zigzag`])
//! - turned into run-length symbols ([`rle`])
//! - Huffman coded with tables built from whole-image statistics ([`huffman`], [`tables`])
//! - packed into one bit sequence ([`bitstream`])
//!
//! and stored in a text table file plus a binary data file ([`container`]).
//! The [`decoder`] reverses every step.
//!
//! # Usage Examples
//!
//! ## Encode an image
//!
//! ```rust,ignore
//! dctpack_core::api::encode::prepare()
//!     .with_image("photo.png")
//!     .with_table_output("table.txt")
//!     .with_data_output("image.bin")
//!     .execute()
//!     .expect("Failed to encode image");
//! ```
//!
//! ## Decode it again
//!
//! ```rust,ignore
//! dctpack_core::api::decode::prepare()
//!     .with_table_input("table.txt")
//!     .with_data_input("image.bin")
//!     .with_output("restored.png")
//!     .execute()
//!     .expect("Failed to decode image");
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod bitstream;
pub mod block;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod huffman;
pub mod media;
pub mod quant;
pub mod rle;
pub mod tables;
pub mod transform;
pub mod value;
pub mod zigzag;

pub use crate::block::{Block, Channel, ChannelClass, CoefficientVector};
pub use crate::container::ImageGeometry;
pub use crate::decoder::{decode, decode_files};
pub use crate::encoder::{encode, encode_quantized, EncodedImage, QuantizedImage, TransformedImage};
pub use crate::error::{DecodeError, EncodeError, Result};
pub use crate::huffman::{Code, CodeTable, TableKey};
pub use crate::rle::Symbol;
pub use crate::tables::{CodeTables, TableKind};
pub use crate::transform::{Dct2, Transform};
