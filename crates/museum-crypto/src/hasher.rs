/// BLAKE3 content digest.
///
/// Produces the 64-character lowercase hex fingerprint that keys every stored
/// object. No domain tag is mixed in, so digests match the output of standard
/// BLAKE3 tools (`b3sum`) for the same bytes.
pub struct ContentHasher;

impl ContentHasher {
    /// Length of a hex digest produced by [`ContentHasher::digest`].
    pub const HEX_LEN: usize = 64;

    /// Hex digest of `data`.
    pub fn digest(data: &[u8]) -> String {
        blake3::hash(data).to_hex().to_string()
    }

    /// Raw 32-byte digest of `data`.
    pub fn raw_digest(data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    /// Verify that `data` hashes to `expected` (hex, case-insensitive).
    pub fn verify(data: &[u8], expected: &str) -> bool {
        Self::digest(data).eq_ignore_ascii_case(expected)
    }
}
