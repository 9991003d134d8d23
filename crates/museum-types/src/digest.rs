//! Shape validation for hex digests used as storage keys.

use crate::error::TypeError;

/// Minimum digest length: two shard levels of two hex characters each.
pub const MIN_DIGEST_LEN: usize = 4;

/// Check that `digest` can be used to address an object.
///
/// A digest must hold at least [`MIN_DIGEST_LEN`] characters, all ASCII hex
/// digits. The check says nothing about which hash function produced it.
///
/// ```
/// use museum_types::validate_digest;
///
/// assert!(validate_digest("abcd").is_ok());
/// assert!(validate_digest("ab").is_err());
/// assert!(validate_digest("../etc").is_err());
/// ```
pub fn validate_digest(digest: &str) -> Result<(), TypeError> {
    if digest.len() < MIN_DIGEST_LEN {
        return Err(TypeError::InvalidDigest {
            digest: digest.to_string(),
            reason: format!(
                "need at least {MIN_DIGEST_LEN} hex characters, got {}",
                digest.len()
            ),
        });
    }
    if let Some(ch) = digest.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(TypeError::InvalidDigest {
            digest: digest.to_string(),
            reason: format!("non-hex character: {ch:?}"),
        });
    }
    Ok(())
}
