use thiserror::Error;

/// Why a single entry was left out of a content tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed entry path")]
    Malformed,

    #[error("name is already taken by another entry")]
    Collision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: SkipReason,
}

/// Errors of [`ArchiveRegistry`](crate::ArchiveRegistry) lookups.
///
/// A failed lookup never leaves anything cached, so retrying is always safe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("entry {entry:?} not found in {base}")]
    NotFound { base: String, entry: String },

    #[error("{address} is nested more than {limit} levels deep")]
    TooDeep { address: String, limit: usize },

    #[error("{address} does not name an archive entry")]
    NotAnEntry { address: String },

    #[error("unable to read {locator}: {message}")]
    Io { locator: String, message: String },

    #[error("unable to read archive {address}: {message}")]
    Archive { address: String, message: String },
}

impl ResolveError {
    pub(crate) fn io(locator: &str, err: &anyhow::Error) -> Self {
        ResolveError::Io {
            locator: locator.to_string(),
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn archive(address: &str, err: &anyhow::Error) -> Self {
        ResolveError::Archive {
            address: address.to_string(),
            message: format!("{err:#}"),
        }
    }
}
