use std::path::PathBuf;

use museum_types::{ErrorKind, TypeError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The digest is too short or not hex.
    #[error(transparent)]
    InvalidDigest(#[from] TypeError),

    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Stored bytes no longer hash to their digest (data corruption).
    #[error("hash mismatch for {digest}: computed {computed}")]
    HashMismatch { digest: String, computed: String },

    /// A file handed to `ingest` could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Ingest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDigest(e) => e.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::HashMismatch { .. } => ErrorKind::InvalidFormat,
            Self::Ingest { .. } | Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
