use rand::RngCore;
use zeroize::{Zeroizing, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Backup key size (256 bits).
pub const BACKUP_KEY_SIZE: usize = 32;

/// Symmetric key for sealing and opening library backups.
///
/// The key bytes are wiped when the value is dropped and never appear in
/// `Debug` output.
#[derive(Clone, ZeroizeOnDrop)]
pub struct BackupKey {
    bytes: [u8; BACKUP_KEY_SIZE],
}

impl BackupKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; BACKUP_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Generate a random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; BACKUP_KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Build a key from a slice, checking its length.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        if slice.len() != BACKUP_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: BACKUP_KEY_SIZE,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; BACKUP_KEY_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self { bytes })
    }

    /// Parse a hex-encoded key. Surrounding whitespace is ignored, so a key
    /// file ending in a newline parses.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let decoded = Zeroizing::new(
            hex::decode(s.trim()).map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?,
        );
        Self::try_from_slice(&decoded)
    }

    /// Hex encoding of the key, for writing key files.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.bytes))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; BACKUP_KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for BackupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let a = BackupKey::generate();
        let b = BackupKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn hex_roundtrip_with_trailing_newline() {
        let key = BackupKey::from_bytes([7u8; BACKUP_KEY_SIZE]);
        let encoded = format!("{}\n", key.to_hex().as_str());
        let parsed = BackupKey::from_hex(&encoded).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn wrong_length_rejected() {
        let err = BackupKey::try_from_slice(&[0u8; 16]).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            }
        );
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(matches!(
            BackupKey::from_hex("zz"),
            Err(CryptoError::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let key = BackupKey::from_bytes([0xab; BACKUP_KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(debug.contains("BackupKey"));
        assert!(!debug.contains("ab"));
    }
}
