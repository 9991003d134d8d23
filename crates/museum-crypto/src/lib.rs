//! Cryptographic primitives for the museum media library.
//!
//! Provides the content digest used to address stored objects (BLAKE3-256,
//! lowercase hex) and authenticated encryption of whole-library backups
//! (XChaCha20-Poly1305 behind a small versioned header).
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod error;
pub mod hasher;
pub mod key;
pub mod seal;

pub use error::{CryptoError, CryptoResult};
pub use hasher::ContentHasher;
pub use key::{BackupKey, BACKUP_KEY_SIZE};
pub use seal::{open, seal, BackupHeader, BACKUP_FORMAT_VERSION, BACKUP_MAGIC, HEADER_SIZE};
