use std::collections::HashMap;
use std::sync::RwLock;

use museum_types::{validate_digest, ContentReference};

use crate::error::{StoreError, StoreResult};
use crate::shard::{relative_object_path, DEFAULT_OBJECTS_DIR};
use crate::traits::ContentStore;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Follows the same contract as
/// [`FsContentStore`](crate::FsContentStore), including the relative paths it
/// reports, so callers can swap backends without changing references.
pub struct InMemoryContentStore {
    objects_dir: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryContentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects_dir: DEFAULT_OBJECTS_DIR.to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Return a sorted list of all digests in the store.
    pub fn all_digests(&self) -> Vec<String> {
        let map = self.objects.read().expect("lock poisoned");
        let mut digests: Vec<String> = map.keys().cloned().collect();
        digests.sort();
        digests
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryContentStore {
    fn exists(&self, digest: &str) -> bool {
        self.objects.read().expect("lock poisoned").contains_key(digest)
    }

    fn store(&self, bytes: &[u8], digest: &str) -> StoreResult<ContentReference> {
        let relative = relative_object_path(&self.objects_dir, digest)?;
        let mut map = self.objects.write().expect("lock poisoned");
        map.entry(digest.to_string())
            .or_insert_with(|| bytes.to_vec());
        Ok(ContentReference::new(digest, relative, bytes.len() as u64))
    }

    fn load(&self, digest: &str) -> StoreResult<Vec<u8>> {
        validate_digest(digest)?;
        let map = self.objects.read().expect("lock poisoned");
        map.get(digest)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(digest.to_string()))
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryContentStore")
            .field("object_count", &count)
            .finish()
    }
}
