use std::cmp::Ordering;

/// A node of a [`Content`](super::Content) tree.
///
/// The tree is built once and then only read, so every consumer matches on
/// the variant instead of probing for capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(File),
    Folder(Folder),
    JavaClass(JavaClass),
    JavaPackage(JavaPackage),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Folder(folder) => &folder.name,
            Node::JavaClass(class) => &class.name,
            Node::JavaPackage(package) => &package.folder.name,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Node::File(file) => &file.address,
            Node::Folder(folder) => &folder.address,
            Node::JavaClass(class) => &class.address,
            Node::JavaPackage(package) => &package.folder.address,
        }
    }

    /// Child nodes, empty for leaves.
    ///
    /// For a package these are its resources; its classes are reached through
    /// [`JavaPackage::classes`].
    pub fn files(&self) -> &[Node] {
        match self {
            Node::Folder(folder) => &folder.files,
            Node::JavaPackage(package) => &package.folder.files,
            Node::File(_) | Node::JavaClass(_) => &[],
        }
    }

    pub(crate) fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::JavaPackage(package) => Some(&mut package.folder),
            Node::File(_) | Node::JavaClass(_) => None,
        }
    }
}

/// A plain archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub(crate) name: String,
    pub(crate) address: String,
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// A directory, created the first time an entry needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) files: Vec<Node>,
}

impl Folder {
    pub(crate) fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn files(&self) -> &[Node] {
        &self.files
    }

    /// Children in display order.
    pub fn sorted_files(&self) -> Vec<&Node> {
        let mut files: Vec<&Node> = self.files.iter().collect();
        files.sort_by(|a, b| display_order(a.name(), b.name()));
        files
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.files.iter().find(|node| node.name() == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.files.iter_mut().find(|node| node.name() == name)
    }
}

/// A compiled class. `nested` is left empty by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaClass {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) nested: Vec<JavaClass>,
}

impl JavaClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn nested(&self) -> &[JavaClass] {
        &self.nested
    }
}

/// A Java package: every class whose directory spells its dotted name, plus
/// the resources below that directory.
///
/// The name is the dotted package name. The address points at the package's
/// directory so that it stays usable as an entry locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaPackage {
    pub(crate) folder: Folder,
    pub(crate) directory: String,
    pub(crate) classes: Vec<JavaClass>,
}

impl JavaPackage {
    pub fn name(&self) -> &str {
        &self.folder.name
    }

    pub fn address(&self) -> &str {
        &self.folder.address
    }

    /// The dotted name with `/` separators.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn classes(&self) -> &[JavaClass] {
        &self.classes
    }

    pub fn files(&self) -> &[Node] {
        &self.folder.files
    }

    pub fn sorted_classes(&self) -> Vec<&JavaClass> {
        let mut classes: Vec<&JavaClass> = self.classes.iter().collect();
        classes.sort_by(|a, b| display_order(&a.name, &b.name));
        classes
    }

    pub fn sorted_files(&self) -> Vec<&Node> {
        self.folder.sorted_files()
    }
}

/// Case-insensitive name order, ties broken by the raw names.
pub fn display_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
