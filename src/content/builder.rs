use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::node::{File, Folder, JavaClass, JavaPackage, Node};
use super::Content;
use crate::error::{SkipReason, SkippedEntry};
use crate::path::{basename, dirname, join, join_dotted, relative_to, split_segments};

/// Extension that marks an entry as a compiled class.
pub const CLASS_EXTENSION: &str = ".class";

/// Name of the root node of every tree.
pub const CONTENT_NAME: &str = "content";

/// Turns a flat list of entry paths into a [`Content`] tree.
///
/// Classes are grouped first so that the directories they live in are known
/// as packages before any other entry is placed. Input order does not matter.
pub struct ContentBuilder {
    root: Folder,
    packages: Vec<JavaPackage>,
    package_index: HashMap<String, usize>,
    class_addresses: HashSet<String>,
    class_extension: String,
    skipped: Vec<SkippedEntry>,
}

impl ContentBuilder {
    pub fn new(root_address: impl Into<String>) -> Self {
        Self {
            root: Folder::new(CONTENT_NAME, root_address),
            packages: Vec::new(),
            package_index: HashMap::new(),
            class_addresses: HashSet::new(),
            class_extension: CLASS_EXTENSION.to_string(),
            skipped: Vec::new(),
        }
    }

    pub fn class_extension(mut self, extension: impl Into<String>) -> Self {
        self.class_extension = extension.into();
        self
    }

    pub fn build<I, S>(mut self, entries: I) -> Content
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<S> = entries.into_iter().collect();
        let (classes, files): (Vec<&str>, Vec<&str>) = entries
            .iter()
            .map(<S as AsRef<str>>::as_ref)
            .partition(|path| path.ends_with(self.class_extension.as_str()));

        for path in classes {
            let result = validate(path).and_then(|()| self.add_class(path));
            self.record(path, result);
        }
        for path in files {
            let result = validate(path).and_then(|()| self.add_file(path));
            self.record(path, result);
        }

        debug!(
            root = %self.root.address,
            packages = self.packages.len(),
            files = self.root.files.len(),
            skipped = self.skipped.len(),
            "built content tree"
        );

        Content {
            root: self.root,
            packages: self.packages,
            skipped: self.skipped,
        }
    }

    fn record(&mut self, path: &str, result: Result<(), SkipReason>) {
        if let Err(reason) = result {
            warn!(path, %reason, "skipping archive entry");
            self.skipped.push(SkippedEntry {
                path: path.to_string(),
                reason,
            });
        }
    }

    fn add_class(&mut self, path: &str) -> Result<(), SkipReason> {
        let segments = split_segments(dirname(path));
        let package_name = join_dotted(&segments);

        let existing = self.package_index.get(&package_name).copied();
        let idx = existing.unwrap_or_else(|| self.new_package(package_name));

        // `a.b/X.class` joins package `a.b` but keeps its own entry address
        let name = basename(path);
        let address = join(&join(&self.root.address, &segments.join("/")), name);
        if !self.class_addresses.insert(address.clone()) {
            return Err(SkipReason::Collision);
        }
        self.packages[idx].classes.push(JavaClass {
            name: name.to_string(),
            address,
            nested: Vec::new(),
        });
        Ok(())
    }

    /// A package lives in the directory its dotted name spells out.
    fn new_package(&mut self, name: String) -> usize {
        let directory = name.replace('.', "/");
        let address = join(&self.root.address, &directory);
        let idx = self.packages.len();
        self.package_index.insert(name.clone(), idx);
        self.packages.push(JavaPackage {
            folder: Folder::new(name, address),
            directory,
            classes: Vec::new(),
        });
        idx
    }

    /// Places a non-class entry under the deepest package whose directory
    /// contains it, or under the root when there is none.
    fn add_file(&mut self, path: &str) -> Result<(), SkipReason> {
        let segments = split_segments(dirname(path));
        for len in (1..=segments.len()).rev() {
            let Some(&idx) = self.package_index.get(&join_dotted(&segments[..len])) else {
                continue;
            };
            let package = &mut self.packages[idx];
            if let Some(relative) = relative_to(&package.directory, path) {
                return place(&mut package.folder, relative);
            }
        }
        place(&mut self.root, path)
    }
}

/// Creates the folders `relative` needs below `folder` and appends the file.
fn place(folder: &mut Folder, relative: &str) -> Result<(), SkipReason> {
    let file_name = basename(relative);
    let mut current = folder;
    for segment in split_segments(dirname(relative)) {
        if current.child(segment).is_none() {
            let address = join(&current.address, segment);
            current.files.push(Node::Folder(Folder::new(segment, address)));
        }
        current = current
            .child_mut(segment)
            .and_then(Node::as_folder_mut)
            .ok_or(SkipReason::Collision)?;
    }

    if current.child(file_name).is_some() {
        return Err(SkipReason::Collision);
    }
    let address = join(&current.address, file_name);
    current.files.push(Node::File(File {
        name: file_name.to_string(),
        address,
    }));
    Ok(())
}

fn validate(path: &str) -> Result<(), SkipReason> {
    if path.is_empty() || path.starts_with('/') || basename(path).is_empty() {
        return Err(SkipReason::Malformed);
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(SkipReason::Malformed);
    }
    Ok(())
}
