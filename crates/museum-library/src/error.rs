use std::path::{Path, PathBuf};

use museum_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("library already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("an item is already installed at {}", .0.display())]
    AlreadyInstalled(PathBuf),

    #[error("invalid bundle {}: {reason}", path.display())]
    InvalidBundle { path: PathBuf, reason: String },

    #[error("restore destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("backup destination {} is inside the library root", .0.display())]
    BackupInsideLibrary(PathBuf),

    #[error("backup not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("{}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("type error: {0}")]
    Type(#[from] museum_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] museum_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] museum_index::IndexError),

    #[error("crypto error: {0}")]
    Crypto(#[from] museum_crypto::CryptoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyInitialized(_)
            | Self::AlreadyInstalled(_)
            | Self::InvalidBundle { .. }
            | Self::DestinationExists(_)
            | Self::BackupInsideLibrary(_) => ErrorKind::InvalidArgument,
            Self::BackupNotFound(_) => ErrorKind::NotFound,
            Self::Config { .. } => ErrorKind::InvalidFormat,
            Self::FileSystem { .. } | Self::Io(_) => ErrorKind::Io,
            Self::Type(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Index(e) => e.kind(),
            Self::Crypto(e) => e.kind(),
        }
    }
}

/// Attach the offending path to an I/O error.
pub(crate) fn fs_err(path: &Path) -> impl FnOnce(std::io::Error) -> LibraryError + '_ {
    move |source| LibraryError::FileSystem {
        path: path.to_path_buf(),
        source,
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
