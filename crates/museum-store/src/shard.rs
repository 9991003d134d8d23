use museum_types::validate_digest;

use crate::error::StoreResult;

/// Default name of the directory holding sharded objects.
pub const DEFAULT_OBJECTS_DIR: &str = "Objects";

/// Split a validated digest into its two shard prefixes.
pub(crate) fn shard_prefixes(digest: &str) -> StoreResult<(&str, &str)> {
    validate_digest(digest)?;
    // Validation guarantees at least four ASCII characters.
    Ok((&digest[0..2], &digest[2..4]))
}

/// Store-root-relative path of an object, with `/` separators.
///
/// ```
/// use museum_store::relative_object_path;
///
/// let path = relative_object_path("Objects", "abcdef").unwrap();
/// assert_eq!(path, "Objects/ab/cd/abcdef");
/// ```
pub fn relative_object_path(objects_dir: &str, digest: &str) -> StoreResult<String> {
    let (first, second) = shard_prefixes(digest)?;
    Ok(format!("{objects_dir}/{first}/{second}/{digest}"))
}
