use std::{io, path::PathBuf};

use crate::utils::ObjectId;

/// Errors raised by the object store, the tree builder and repository lookup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Canonical header or tree payload could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Creating a shard directory or writing an object file failed.
    #[error("storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No object exists for the given id or prefix.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Stored bytes failed to decompress, decode or re-hash.
    #[error("corrupt object {id}: {reason}")]
    Corrupt { id: ObjectId, reason: String },

    /// A file or directory could not be read while building a tree.
    #[error("cannot read {}: {source}", .path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("short object id {0} is ambiguous")]
    AmbiguousPrefix(String),

    #[error("not a vit repository (or any of the parent directories): {}", .0.display())]
    NotARepository(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn traversal(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Traversal {
            path: path.into(),
            source,
        }
    }
}
