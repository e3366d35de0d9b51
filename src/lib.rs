//! # jarlens
//!
//! Browse the contents of Java archives, including archives stored inside
//! other archives.
//!
//! Entries are addressed with `!/` separated addresses such as
//! `jar:/opt/app.jar!/lib/dep.jar!/META-INF/MANIFEST.MF`. The
//! [`ArchiveRegistry`] opens each archive of such a chain once, shares the
//! result between concurrent callers and builds a package-oriented
//! [`Content`] tree for it.
//!
//! ## Features
//!
//! - Archives on the local filesystem or behind HTTP/HTTPS URLs (Range requests)
//! - Arbitrarily nested archives, bounded by a configurable depth
//! - Classes grouped into Java packages, resources merged into their package
//! - Change notifications that evict every archive read from a file
//! - ZIP64 archives with STORED and DEFLATE entries
//!
//! ## Example
//!
//! ```no_run
//! use jarlens::ArchiveRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ArchiveRegistry::default();
//!
//!     let handle = registry.resolve_content("jar:/opt/app.jar!/lib/dep.jar").await?;
//!     for package in handle.content().sorted_packages() {
//!         println!("{} ({} classes)", package.name(), package.classes().len());
//!     }
//!
//!     let manifest = registry
//!         .read_entry_text("jar:/opt/app.jar!/META-INF/MANIFEST.MF")
//!         .await?;
//!     println!("{manifest}");
//!
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod cli;
pub mod content;
pub mod error;
pub mod io;
pub mod path;
pub mod registry;
pub mod zip;

pub use cli::{Cli, LogLevel};
pub use content::{Content, ContentBuilder, File, Folder, JavaClass, JavaPackage, Node};
pub use error::{ResolveError, SkipReason, SkippedEntry};
pub use io::{DefaultFileAccess, FileAccess, HttpRangeReader, LocalFileReader, MemoryFileAccess, ReadAt};
pub use registry::{ArchiveHandle, ArchiveRegistry, Invalidation, RegistryConfig};
pub use zip::{ArchiveReader, ZipArchiveReader, ZipExtractor, ZipFileEntry};
