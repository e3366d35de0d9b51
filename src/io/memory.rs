use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{FileAccess, ReadAt};

/// Random access over bytes already in memory, e.g. a nested archive.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    data: Bytes,
}

impl MemoryReader {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start <= self.data.len())
            .ok_or_else(|| anyhow!("Offset {} is past the end of the data", offset))?;
        let len = buf.len().min(self.data.len() - start);
        buf[..len].copy_from_slice(&self.data[start..start + len]);
        Ok(len)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Serves archives from an in-memory table keyed by locator.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileAccess {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryFileAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the file at `locator`.
    pub fn insert(&self, locator: impl Into<String>, data: impl Into<Bytes>) {
        self.files.write().insert(locator.into(), data.into());
    }

    pub fn remove(&self, locator: &str) -> Option<Bytes> {
        self.files.write().remove(locator)
    }
}

#[async_trait]
impl FileAccess for MemoryFileAccess {
    async fn read_all(&self, locator: &str) -> Result<Bytes> {
        self.files
            .read()
            .get(locator)
            .cloned()
            .ok_or_else(|| anyhow!("No such file: {}", locator))
    }
}
