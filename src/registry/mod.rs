//! Shared cache of opened archives.
//!
//! An [`ArchiveRegistry`] owns every archive opened during a session. Each
//! archive address (compared as an exact string) is read and indexed at most
//! once; concurrent requests for an address that is still being opened wait
//! for the same build instead of starting another one.
//!
//! Nested archives are opened by first opening the archive that contains
//! them, so `jar:/a.jar!/b.jar` caches both `jar:/a.jar` and itself.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::{OnceCell, broadcast};
use tracing::{debug, info, instrument};

use crate::address;
use crate::content::{CLASS_EXTENSION, Content, ContentBuilder};
use crate::error::ResolveError;
use crate::io::{DefaultFileAccess, FileAccess};
use crate::zip::{ArchiveReader, ZipArchiveReader, ZipFileEntry};


/// Default limit on `!/` separators in an archive address.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 8;

/// Capacity of the invalidation channel before slow observers lag.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Archive addresses with more nesting separators than this are refused
    /// before any I/O happens.
    pub max_nesting_depth: usize,
    /// Entries ending with this are treated as classes.
    pub class_extension: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            class_extension: CLASS_EXTENSION.to_string(),
        }
    }
}

/// An opened archive: its bytes, raw entry index and content tree.
#[derive(Debug)]
pub struct ArchiveHandle {
    address: String,
    data: Bytes,
    entries: Vec<ZipFileEntry>,
    /// Position in `entries` of each file entry, first one wins.
    files: HashMap<String, usize>,
    content: Content,
}

impl ArchiveHandle {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// The file entry named `path`, without a leading `/`.
    pub fn entry(&self, path: &str) -> Option<&ZipFileEntry> {
        self.files.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

/// Sent to observers when content served for `address` is out of date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub address: String,
}

type Cell = Arc<OnceCell<Arc<ArchiveHandle>>>;

/// A cached or in-progress open, with the number of requests holding it.
#[derive(Default)]
struct Slot {
    cell: Cell,
    requests: usize,
}

pub struct ArchiveRegistry {
    files: Arc<dyn FileAccess>,
    reader: Arc<dyn ArchiveReader>,
    config: RegistryConfig,
    handles: Mutex<HashMap<String, Slot>>,
    served: Mutex<HashSet<String>>,
    events: broadcast::Sender<Invalidation>,
}

impl Default for ArchiveRegistry {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultFileAccess),
            Arc::new(ZipArchiveReader),
            RegistryConfig::default(),
        )
    }
}

impl ArchiveRegistry {
    pub fn new(
        files: Arc<dyn FileAccess>,
        reader: Arc<dyn ArchiveReader>,
        config: RegistryConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            files,
            reader,
            config,
            handles: Mutex::new(HashMap::new()),
            served: Mutex::new(HashSet::new()),
            events,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Observe invalidations triggered by [`notify_changed`](Self::notify_changed).
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }

    /// The handle for the archive at `address`, opening it if needed.
    ///
    /// Failed opens are not cached. A request joining an open that fails or
    /// is dropped takes it over; with no such request left the address is
    /// forgotten and the next one opens it again.
    pub fn get<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<Arc<ArchiveHandle>, ResolveError>> {
        async move {
            let limit = self.config.max_nesting_depth;
            if address::nesting_depth(address) > limit {
                return Err(ResolveError::TooDeep {
                    address: address.to_string(),
                    limit,
                });
            }

            let pending = PendingSlot {
                registry: self,
                address,
                cell: self.acquire(address),
            };
            if pending.cell.initialized() {
                debug!(address, "archive cache hit");
            }
            let result = pending
                .cell
                .get_or_try_init(|| self.open(address))
                .await
                .cloned();
            result
        }
        .boxed()
    }

    /// The content tree of the archive at `address`.
    pub async fn resolve_content(&self, address: &str) -> Result<Arc<ArchiveHandle>, ResolveError> {
        self.get(address).await
    }

    /// Like [`resolve_content`](Self::resolve_content), but gives up once
    /// `cancel` completes. `Ok(None)` means the request was cancelled.
    pub async fn resolve_content_or_cancel<C>(
        &self,
        address: &str,
        cancel: C,
    ) -> Result<Option<Arc<ArchiveHandle>>, ResolveError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.get(address) => result.map(Some),
            () = cancel => {
                debug!(address, "archive resolution cancelled");
                Ok(None)
            }
        }
    }

    /// Decompressed bytes of `entry_path` inside the archive at `address`.
    pub async fn read_entry(&self, address: &str, entry_path: &str) -> Result<Vec<u8>, ResolveError> {
        let handle = self.get(address).await?;
        self.extract(&handle, entry_path).await
    }

    /// Text of the entry named by a full address such as
    /// `jar:/lib/a.jar!/META-INF/MANIFEST.MF`.
    ///
    /// The address is remembered so that observers hear about it when the
    /// archive changes, until [`notify_closed`](Self::notify_closed).
    pub async fn read_entry_text(&self, address: &str) -> Result<String, ResolveError> {
        let (base, remainder) = address::split(address);
        if remainder.is_empty() {
            return Err(ResolveError::NotAnEntry {
                address: address.to_string(),
            });
        }

        let bytes = self.read_entry(base, remainder).await?;
        self.served.lock().insert(address.to_string());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Drops the cached archive at `address`. Returns whether one was cached.
    pub fn close(&self, address: &str) -> bool {
        let removed = self.handles.lock().remove(address).is_some();
        if removed {
            debug!(address, "closed archive");
        }
        removed
    }

    /// The consumer released `address`: stop tracking it and close it.
    pub fn notify_closed(&self, address: &str) {
        self.served.lock().remove(address);
        self.close(address);
    }

    /// The file at `locator` changed on disk.
    ///
    /// Every archive read from it, directly or nested, is evicted, and every
    /// affected address is announced to subscribers. Returns those addresses.
    pub fn notify_changed(&self, locator: &str) -> Vec<String> {
        let mut stale = Vec::new();
        self.handles.lock().retain(|address, _| {
            let keep = address::physical_locator(address) != locator;
            if !keep {
                stale.push(address.clone());
            }
            keep
        });

        let served: Vec<String> = self
            .served
            .lock()
            .iter()
            .filter(|address| address::physical_locator(address) == locator)
            .cloned()
            .collect();
        stale.extend(served);
        stale.sort();
        stale.dedup();

        if !stale.is_empty() {
            info!(locator, count = stale.len(), "archive changed, invalidating");
        }
        for address in &stale {
            // nobody listening is fine
            let _ = self.events.send(Invalidation {
                address: address.clone(),
            });
        }
        stale
    }

    /// Whether a finished handle is cached for `address`.
    pub fn is_cached(&self, address: &str) -> bool {
        self.handles
            .lock()
            .get(address)
            .is_some_and(|slot| slot.cell.initialized())
    }

    /// Addresses with a finished handle, sorted.
    pub fn cached_addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self
            .handles
            .lock()
            .iter()
            .filter(|(_, slot)| slot.cell.initialized())
            .map(|(address, _)| address.clone())
            .collect();
        addresses.sort();
        addresses
    }

    /// Registers a request for `address` and returns its cell, inserting an
    /// empty slot if missing.
    fn acquire(&self, address: &str) -> Cell {
        let mut handles = self.handles.lock();
        let slot = handles.entry(address.to_string()).or_default();
        slot.requests += 1;
        slot.cell.clone()
    }

    /// Ends a request for `address`. An empty slot leaves the map with its
    /// last request, so a waiter that takes over a failed or abandoned open
    /// still fills the slot everyone else sees.
    fn release(&self, address: &str, cell: &Cell) {
        let mut handles = self.handles.lock();
        let Some(slot) = handles.get_mut(address) else {
            return;
        };
        // closed or replaced while this request ran
        if !Arc::ptr_eq(&slot.cell, cell) {
            return;
        }
        slot.requests -= 1;
        if slot.requests == 0 && !slot.cell.initialized() {
            handles.remove(address);
        }
    }

    /// Decompresses `entry_path` from an opened archive.
    async fn extract(&self, handle: &ArchiveHandle, entry_path: &str) -> Result<Vec<u8>, ResolveError> {
        let name = address::trim(entry_path);
        let entry = handle.entry(name).ok_or_else(|| ResolveError::NotFound {
            base: handle.address.clone(),
            entry: name.to_string(),
        })?;
        self.reader
            .read_entry(&handle.data, entry)
            .await
            .map_err(|err| ResolveError::archive(&handle.address, &err))
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn open(&self, address: &str) -> Result<Arc<ArchiveHandle>, ResolveError> {
        let (base, remainder) = address::split(address);
        let data = if remainder.is_empty() {
            let locator = address::physical_locator(address);
            self.files
                .read_all(locator)
                .await
                .map_err(|err| ResolveError::io(locator, &err))?
        } else {
            let outer = self.get(base).await?;
            Bytes::from(self.extract(&outer, remainder).await?)
        };

        let entries = self
            .reader
            .list_entries(&data)
            .await
            .map_err(|err| ResolveError::archive(address, &err))?;
        let mut files = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            if !entry.is_directory {
                files.entry(entry.file_name.clone()).or_insert(idx);
            }
        }
        let content = ContentBuilder::new(address::content_root(address))
            .class_extension(self.config.class_extension.as_str())
            .build(
                entries
                    .iter()
                    .filter(|entry| !entry.is_directory)
                    .map(|entry| entry.file_name.as_str()),
            );
        debug!(
            address,
            bytes = data.len(),
            entries = entries.len(),
            packages = content.packages().len(),
            "opened archive"
        );

        Ok(Arc::new(ArchiveHandle {
            address: address.to_string(),
            data,
            entries,
            files,
            content,
        }))
    }
}

/// A request's hold on a slot while it waits for or drives the open.
///
/// Dropped on success, failure and cancellation alike.
struct PendingSlot<'a> {
    registry: &'a ArchiveRegistry,
    address: &'a str,
    cell: Cell,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.registry.release(self.address, &self.cell);
    }
}
