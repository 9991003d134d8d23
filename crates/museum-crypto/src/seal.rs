//! Sealed backup container.
//!
//! On-disk format:
//! ```text
//! [8 bytes: magic "MUSEUMBK"]
//! [2 bytes: format version (little-endian u16)]
//! [1 byte:  cipher id (1 = XChaCha20-Poly1305)]
//! [1 byte:  reserved, zero]
//! [24 bytes: nonce]
//! [N bytes: ciphertext || 16-byte Poly1305 tag]
//! ```
//!
//! The 12-byte header is bound to the ciphertext as associated data, so a
//! rewritten version or cipher id fails authentication instead of being
//! reinterpreted.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::key::BackupKey;

/// Magic tag at the start of every backup file.
pub const BACKUP_MAGIC: [u8; 8] = *b"MUSEUMBK";

/// Current container version.
pub const BACKUP_FORMAT_VERSION: u16 = 1;

/// Cipher id for XChaCha20-Poly1305.
const CIPHER_XCHACHA20_POLY1305: u8 = 1;

/// Header size: magic + version + cipher id + reserved.
pub const HEADER_SIZE: usize = 12;

const NONCE_SIZE: usize = 24;
const TAG_SIZE: usize = 16;

/// Parsed container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackupHeader {
    pub version: u16,
    pub cipher: u8,
}

impl BackupHeader {
    fn current() -> Self {
        Self {
            version: BACKUP_FORMAT_VERSION,
            cipher: CIPHER_XCHACHA20_POLY1305,
        }
    }

    /// Encode to the fixed 12-byte layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..8].copy_from_slice(&BACKUP_MAGIC);
        out[8..10].copy_from_slice(&self.version.to_le_bytes());
        out[10] = self.cipher;
        out
    }

    /// Decode and check a header. Rejects unknown versions and ciphers.
    pub fn parse(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CryptoError::MalformedContainer(format!(
                "{} bytes is shorter than the {HEADER_SIZE}-byte header",
                bytes.len()
            )));
        }
        if bytes[..8] != BACKUP_MAGIC {
            return Err(CryptoError::MalformedContainer(
                "missing backup magic".into(),
            ));
        }
        let version = u16::from_le_bytes([bytes[8], bytes[9]]);
        if version != BACKUP_FORMAT_VERSION {
            return Err(CryptoError::UnsupportedVersion(version));
        }
        let cipher = bytes[10];
        if cipher != CIPHER_XCHACHA20_POLY1305 {
            return Err(CryptoError::UnsupportedAlgorithm(cipher));
        }
        Ok(Self { version, cipher })
    }
}

/// Seal `plaintext` under `key`, returning header, nonce, ciphertext and tag
/// as one buffer.
pub fn seal(key: &BackupKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let header = BackupHeader::current().to_bytes();
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CryptoError::SealFailed)?;
    if ciphertext.len() != plaintext.len() + TAG_SIZE {
        return Err(CryptoError::SealFailed);
    }

    let mut out = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open a container produced by [`seal`].
///
/// Fails with [`CryptoError::OpenFailed`] when the key is wrong or any byte
/// after the header was altered.
pub fn open(key: &BackupKey, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
    BackupHeader::parse(sealed)?;
    let body = &sealed[HEADER_SIZE..];
    if body.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::MalformedContainer(format!(
            "container body of {} bytes cannot hold nonce and tag",
            body.len()
        )));
    }

    let (nonce, ciphertext) = body.split_at(NONCE_SIZE);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: &sealed[..HEADER_SIZE],
            },
        )
        .map_err(|_| CryptoError::OpenFailed)
}
