use std::fmt;

use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("invalid digest {digest:?}: {reason}")]
    InvalidDigest { digest: String, reason: String },
}

impl TypeError {
    /// Both variants describe caller-fixable input.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

/// Coarse classification shared by every museum error type.
///
/// Each crate keeps its own detailed error enum; `kind()` on those enums maps
/// a failure onto one of these categories so callers (and the CLI) can react
/// without matching on every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input the caller can fix. Never retried.
    InvalidArgument,
    /// A requested object, manifest, or wing does not exist.
    NotFound,
    /// Stored data (manifest, backup container) could not be decoded.
    InvalidFormat,
    /// Underlying filesystem failure.
    Io,
    /// Cryptographic sealing or opening failed.
    ProcessingFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::NotFound => write!(f, "not found"),
            Self::InvalidFormat => write!(f, "invalid format"),
            Self::Io => write!(f, "I/O error"),
            Self::ProcessingFailed => write!(f, "processing failed"),
        }
    }
}
