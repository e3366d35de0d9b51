//! ZIP archive parsing and extraction.
//!
//! - [`structures`]: records of the format (EOCD, ZIP64 records, entries)
//! - [`parser`]: locating and decoding the Central Directory
//! - [`extractor`]: entry lookup and decompression
//! - [`reader`]: the [`ArchiveReader`] view the rest of the crate uses
//!
//! Standard and ZIP64 archives are understood; entries may be STORED or
//! DEFLATE compressed. Encryption and multi-disk archives are not supported.

mod extractor;
mod parser;
mod reader;
mod structures;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use reader::{ArchiveReader, ZipArchiveReader};
pub use structures::*;
