//! Package-oriented view of an archive's entries.
//!
//! A [`Content`] tree is built in one pass from the entry names of an
//! archive by [`ContentBuilder`] and never changes afterwards:
//!
//! - every directory holding a class file becomes a [`JavaPackage`] named by
//!   its dotted path (`net/example/A.class` lands in `net.example`);
//! - other entries are placed under the deepest package whose directory
//!   contains them, or under the root otherwise, creating [`Folder`]s on the
//!   way.
//!
//! Entries that cannot be placed are reported through [`Content::skipped`]
//! instead of failing the build.

mod builder;
mod node;

pub use builder::{CLASS_EXTENSION, CONTENT_NAME, ContentBuilder};
pub use node::{File, Folder, JavaClass, JavaPackage, Node, display_order};

use crate::error::SkippedEntry;

/// Root of a built tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    root: Folder,
    packages: Vec<JavaPackage>,
    skipped: Vec<SkippedEntry>,
}

impl Content {
    /// Builds a tree whose addresses are the bare entry paths.
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ContentBuilder::new("").build(entries)
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn address(&self) -> &str {
        self.root.address()
    }

    /// Entries that belong to no package.
    pub fn files(&self) -> &[Node] {
        self.root.files()
    }

    pub fn packages(&self) -> &[JavaPackage] {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&JavaPackage> {
        self.packages.iter().find(|package| package.name() == name)
    }

    pub fn sorted_files(&self) -> Vec<&Node> {
        self.root.sorted_files()
    }

    pub fn sorted_packages(&self) -> Vec<&JavaPackage> {
        let mut packages: Vec<&JavaPackage> = self.packages.iter().collect();
        packages.sort_by(|a, b| display_order(a.name(), b.name()));
        packages
    }

    /// Entries left out of the tree, in input order within each pass.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn class_count(&self) -> usize {
        self.packages.iter().map(|package| package.classes().len()).sum()
    }
}
