//! Byte sources for archives.
//!
//! [`ReadAt`] is the random-access view the zip parser works on.
//! [`FileAccess`] loads the outermost archive of an address in one piece,
//! from the local file system or over HTTP.

mod http;
mod local;
mod memory;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use memory::{MemoryFileAccess, MemoryReader};

use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` from `offset`, failing on a short read.
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                bail!(
                    "Unexpected end of data at offset {} ({} of {} bytes read)",
                    offset,
                    filled,
                    buf.len()
                );
            }
            filled += n;
        }
        Ok(())
    }

    /// Read the whole source into memory.
    async fn read_to_end(&self) -> Result<Vec<u8>> {
        let size = usize::try_from(self.size()).context("Source is too large to load")?;
        let mut buf = vec![0u8; size];
        self.read_exact_at(0, &mut buf).await?;
        Ok(buf)
    }
}

/// Loads a whole physical archive given its locator.
#[async_trait]
pub trait FileAccess: Send + Sync {
    async fn read_all(&self, locator: &str) -> Result<Bytes>;
}

/// Reads `http(s)://` locators with Range requests and everything else
/// from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileAccess;

#[async_trait]
impl FileAccess for DefaultFileAccess {
    async fn read_all(&self, locator: &str) -> Result<Bytes> {
        let data = if is_http_url(locator) {
            let reader = HttpRangeReader::new(locator.to_string()).await?;
            let data = reader.read_to_end().await?;
            debug!(
                locator,
                transferred = reader.transferred_bytes(),
                "downloaded archive"
            );
            data
        } else {
            LocalFileReader::new(Path::new(locator))?.read_to_end().await?
        };
        Ok(Bytes::from(data))
    }
}

pub fn is_http_url(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}
