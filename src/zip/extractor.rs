use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use flate2::Crc;
use flate2::read::DeflateDecoder;

use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Decompress an entry into memory, checking its size and CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("Encrypted entries are not supported: {}", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let data_end = data_offset.checked_add(entry.compressed_size);
        if data_end.is_none_or(|end| end > self.parser.reader().size()) {
            bail!(
                "Entry data extends past the end of the archive: {}",
                entry.file_name
            );
        }
        if entry.compression_method == CompressionMethod::Stored
            && entry.uncompressed_size != entry.compressed_size
        {
            bail!(
                "Stored entry sizes disagree for {}: {} vs {} bytes",
                entry.file_name,
                entry.compressed_size,
                entry.uncompressed_size
            );
        }
        let compressed_size = usize::try_from(entry.compressed_size)
            .with_context(|| format!("Entry is too large: {}", entry.file_name))?;
        let mut raw = vec![0u8; compressed_size];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("Truncated entry data: {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // Never inflate past the declared size.
                let mut data = Vec::new();
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut data)
                    .with_context(|| format!("Corrupt deflate stream: {}", entry.file_name))?;
                data
            }
            CompressionMethod::Unknown(method) => {
                bail!(
                    "Unsupported compression method {} for {}",
                    method,
                    entry.file_name
                );
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }
        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!("CRC-32 mismatch for {}", entry.file_name);
        }

        Ok(data)
    }
}
