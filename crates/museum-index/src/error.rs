//! Error types for the index crate.

use std::path::PathBuf;

use museum_types::{ErrorKind, StableId};

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// No manifest exists at the expected location.
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest exists but could not be decoded.
    #[error("malformed manifest {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest decoded but breaks an index rule (duplicate ids, version).
    #[error("invalid manifest {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<IndexError>,
    },

    /// The manifest was written by an incompatible format version.
    #[error("unsupported manifest format version {0:?}")]
    UnsupportedVersion(String),

    /// Two wings share an id.
    #[error("duplicate wing id: {0}")]
    DuplicateWing(StableId),

    /// The referenced wing is not in the index.
    #[error("unknown wing: {0}")]
    UnknownWing(StableId),

    /// Encoding the manifest failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure reading or writing the manifest.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestNotFound(_) | Self::UnknownWing(_) => ErrorKind::NotFound,
            Self::Malformed { .. }
            | Self::Invalid { .. }
            | Self::UnsupportedVersion(_)
            | Self::Serialization(_) => ErrorKind::InvalidFormat,
            Self::DuplicateWing(_) => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
