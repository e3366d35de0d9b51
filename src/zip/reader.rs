use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::io::MemoryReader;

use super::extractor::ZipExtractor;
use super::structures::ZipFileEntry;

/// Reads archives that are fully loaded in memory.
///
/// Listing is done once per archive; the returned records locate each
/// entry's data, so reading one later never walks the directory again.
#[async_trait]
pub trait ArchiveReader: Send + Sync {
    async fn list_entries(&self, data: &Bytes) -> Result<Vec<ZipFileEntry>>;

    /// Decompressed bytes of `entry`, a record from [`list_entries`](Self::list_entries).
    async fn read_entry(&self, data: &Bytes, entry: &ZipFileEntry) -> Result<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveReader;

impl ZipArchiveReader {
    fn extractor(data: &Bytes) -> ZipExtractor<MemoryReader> {
        ZipExtractor::new(Arc::new(MemoryReader::new(data.clone())))
    }
}

#[async_trait]
impl ArchiveReader for ZipArchiveReader {
    async fn list_entries(&self, data: &Bytes) -> Result<Vec<ZipFileEntry>> {
        Self::extractor(data).list_files().await
    }

    async fn read_entry(&self, data: &Bytes, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        Self::extractor(data).extract_to_memory(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{ZipWriter, jar};
    use super::*;

    fn paths(entries: &[ZipFileEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.file_name.as_str()).collect()
    }

    async fn read(data: &Bytes, name: &str) -> Result<Vec<u8>> {
        let entries = ZipArchiveReader.list_entries(data).await?;
        let entry = entries
            .iter()
            .find(|entry| entry.file_name == name)
            .unwrap_or_else(|| panic!("no entry {name}"));
        ZipArchiveReader.read_entry(data, entry).await
    }

    #[tokio::test]
    async fn lists_entries_in_order() {
        let data = Bytes::from(
            ZipWriter::new()
                .directory("META-INF/")
                .stored("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n")
                .deflated("net/example/Test.class", &[0xCA, 0xFE, 0xBA, 0xBE])
                .finish(),
        );

        let entries = ZipArchiveReader.list_entries(&data).await.unwrap();
        assert_eq!(
            paths(&entries),
            vec!["META-INF/", "META-INF/MANIFEST.MF", "net/example/Test.class"]
        );
        assert!(entries[0].is_directory);
        assert!(!entries[1].is_directory);
        assert_eq!(entries[2].uncompressed_size, 4);
    }

    #[tokio::test]
    async fn reads_stored_and_deflated_entries() {
        let text = "hello ".repeat(200);
        let data = Bytes::from(
            ZipWriter::new()
                .stored("plain.txt", b"stored body")
                .deflated("big.txt", text.as_bytes())
                .finish(),
        );

        assert_eq!(read(&data, "plain.txt").await.unwrap(), b"stored body");
        assert_eq!(read(&data, "big.txt").await.unwrap(), text.as_bytes());
    }

    #[tokio::test]
    async fn reads_recorded_entries_without_the_directory() {
        let data = ZipWriter::new().stored("a.txt", b"a").stored("b.txt", b"bb").finish();
        let entries = ZipArchiveReader
            .list_entries(&Bytes::from(data.clone()))
            .await
            .unwrap();

        // wipe the end record: a directory walk would now fail
        let mut damaged = data;
        let len = damaged.len();
        damaged[len - 22..].fill(0);
        let damaged = Bytes::from(damaged);
        assert!(ZipArchiveReader.list_entries(&damaged).await.is_err());

        let b = ZipArchiveReader.read_entry(&damaged, &entries[1]).await.unwrap();
        assert_eq!(b, b"bb");
    }

    #[tokio::test]
    async fn finds_end_record_behind_comment() {
        let data = Bytes::from(
            ZipWriter::new()
                .stored("a.txt", b"a")
                .finish_with_comment(b"built by hand"),
        );
        let entries = ZipArchiveReader.list_entries(&data).await.unwrap();
        assert_eq!(paths(&entries), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn reads_zip64_end_records() {
        let data = Bytes::from(
            ZipWriter::new()
                .stored("a.txt", b"a")
                .stored("b/c.txt", b"c")
                .finish_zip64(),
        );
        let entries = ZipArchiveReader.list_entries(&data).await.unwrap();
        assert_eq!(paths(&entries), vec!["a.txt", "b/c.txt"]);
        assert_eq!(read(&data, "b/c.txt").await.unwrap(), b"c");
    }

    #[tokio::test]
    async fn empty_archive_lists_nothing() {
        let data = Bytes::from(ZipWriter::new().finish());
        assert!(ZipArchiveReader.list_entries(&data).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_zip_data() {
        let err = ZipArchiveReader
            .list_entries(&Bytes::from_static(b"definitely not a zip archive"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Not a valid ZIP file"));

        let tiny = ZipArchiveReader.list_entries(&Bytes::from_static(b"PK")).await;
        assert!(tiny.is_err());
    }

    #[tokio::test]
    async fn rejects_truncated_central_directory() {
        let mut data = jar(&["a.txt", "b.txt"]);
        // point the central directory past the end record
        let len = data.len();
        data[len - 6..len - 2].copy_from_slice(&(len as u32).to_le_bytes());
        let err = ZipArchiveReader.list_entries(&Bytes::from(data)).await.unwrap_err();
        assert!(err.to_string().contains("past the end"));
    }

    #[tokio::test]
    async fn rejects_entry_sizes_beyond_the_archive() {
        let data = Bytes::from(ZipWriter::new().stored("a.txt", b"payload").finish());
        let mut entry = ZipArchiveReader.list_entries(&data).await.unwrap().remove(0);

        entry.compressed_size = 1 << 60;
        entry.uncompressed_size = 1 << 60;
        let err = ZipArchiveReader.read_entry(&data, &entry).await.unwrap_err();
        assert!(err.to_string().contains("past the end of the archive"));

        entry.compressed_size = u64::MAX;
        let err = ZipArchiveReader.read_entry(&data, &entry).await.unwrap_err();
        assert!(err.to_string().contains("past the end of the archive"));
    }

    #[tokio::test]
    async fn rejects_oversized_central_directory_sizes() {
        let mut data = ZipWriter::new().stored("a.txt", b"payload").finish();
        // local header (30) + name (5) + payload (7), then 20 bytes into the
        // central header is the compressed size
        data[62..66].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        let err = read(&Bytes::from(data), "a.txt").await.unwrap_err();
        assert!(err.to_string().contains("past the end of the archive"));
    }

    #[tokio::test]
    async fn rejects_stored_size_mismatch() {
        let data = Bytes::from(ZipWriter::new().stored("a.txt", b"payload").finish());
        let mut entry = ZipArchiveReader.list_entries(&data).await.unwrap().remove(0);
        entry.uncompressed_size = 1 << 40;
        let err = ZipArchiveReader.read_entry(&data, &entry).await.unwrap_err();
        assert!(err.to_string().contains("sizes disagree"));
    }

    #[tokio::test]
    async fn detects_corrupted_content() {
        let mut data = ZipWriter::new().stored("a.txt", b"payload").finish();
        // local header (30) + name (5) is where the stored bytes start
        data[35] ^= 0xFF;
        let err = read(&Bytes::from(data), "a.txt").await.unwrap_err();
        assert!(err.to_string().contains("CRC-32 mismatch"));
    }
}
