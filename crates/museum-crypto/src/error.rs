use museum_types::ErrorKind;

/// Errors from digest, key, and sealing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material has the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key material is not valid hex.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// The backup container is truncated or does not start with the magic tag.
    #[error("malformed backup container: {0}")]
    MalformedContainer(String),

    /// The container was written by a format version this build cannot read.
    #[error("unsupported backup format version {0}")]
    UnsupportedVersion(u16),

    /// The container names a cipher this build does not know.
    #[error("unsupported backup cipher id {0}")]
    UnsupportedAlgorithm(u8),

    /// Sealing did not produce a combined ciphertext.
    #[error("sealing failed")]
    SealFailed,

    /// Authentication failed: wrong key, or the container was altered.
    #[error("backup authentication failed: wrong key or corrupted data")]
    OpenFailed,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKeyLength { .. } | Self::InvalidKeyEncoding(_) => {
                ErrorKind::InvalidArgument
            }
            Self::MalformedContainer(_)
            | Self::UnsupportedVersion(_)
            | Self::UnsupportedAlgorithm(_) => ErrorKind::InvalidFormat,
            Self::SealFailed | Self::OpenFailed => ErrorKind::ProcessingFailed,
        }
    }
}

/// Result alias for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
