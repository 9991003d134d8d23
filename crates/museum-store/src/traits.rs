use std::path::Path;

use museum_crypto::ContentHasher;
use museum_types::ContentReference;

use crate::error::{StoreError, StoreResult};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - An object's location is a pure function of its digest.
/// - Objects are write-once. An existing object is assumed byte-identical to
///   any later store under the same digest, so the later store is a no-op.
/// - Concurrent stores of the same digest are harmless.
/// - The store never interprets object contents.
pub trait ContentStore: Send + Sync {
    /// Returns `true` iff an object exists for `digest`.
    ///
    /// A malformed digest cannot name an object, so it yields `false`
    /// instead of an error.
    fn exists(&self, digest: &str) -> bool;

    /// Persist `bytes` under `digest` unless an object is already present.
    ///
    /// The digest is taken as given; callers that have not computed it
    /// should use [`ContentStore::ingest`] or [`ContentStore::store_bytes`].
    fn store(&self, bytes: &[u8], digest: &str) -> StoreResult<ContentReference>;

    /// Read the full contents of an object.
    fn load(&self, digest: &str) -> StoreResult<Vec<u8>>;

    /// Hash `bytes` and store them under the resulting digest.
    fn store_bytes(&self, bytes: &[u8]) -> StoreResult<ContentReference> {
        let digest = ContentHasher::digest(bytes);
        self.store(bytes, &digest)
    }

    /// Read a file fully into memory, hash it, and store it.
    fn ingest(&self, path: &Path) -> StoreResult<ContentReference> {
        let bytes = std::fs::read(path).map_err(|source| StoreError::Ingest {
            path: path.to_path_buf(),
            source,
        })?;
        self.store_bytes(&bytes)
    }

    /// Re-hash a stored object and check it still matches its digest.
    fn verify(&self, digest: &str) -> StoreResult<()> {
        let bytes = self.load(digest)?;
        let computed = ContentHasher::digest(&bytes);
        if computed.eq_ignore_ascii_case(digest) {
            Ok(())
        } else {
            Err(StoreError::HashMismatch {
                digest: digest.to_string(),
                computed,
            })
        }
    }
}
