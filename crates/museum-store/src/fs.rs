use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use museum_types::ContentReference;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::shard::{relative_object_path, shard_prefixes, DEFAULT_OBJECTS_DIR};
use crate::traits::ContentStore;

/// Content-addressed store on the local filesystem.
///
/// Objects live under `<root>/<objects_dir>/<aa>/<bb>/<digest>`. New objects
/// are written to a temp file in their shard directory and linked into place
/// without clobbering, so readers only ever see complete objects and racing
/// writers of the same digest both succeed.
#[derive(Clone, Debug)]
pub struct FsContentStore {
    root: PathBuf,
    objects_dir: String,
}

impl FsContentStore {
    /// Open a store rooted at `root` using the default `Objects` directory.
    ///
    /// Nothing is created until the first object is stored.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_objects_dir(root, DEFAULT_OBJECTS_DIR)
    }

    /// Open a store with a custom objects directory name.
    pub fn with_objects_dir(root: impl Into<PathBuf>, objects_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            objects_dir: objects_dir.into(),
        }
    }

    /// The store root; `ContentReference::relative_path` is relative to it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the sharded objects.
    pub fn objects_root(&self) -> PathBuf {
        self.root.join(&self.objects_dir)
    }

    /// Absolute location of the object for `digest`.
    ///
    /// Pure function of the digest; the file need not exist.
    pub fn locate(&self, digest: &str) -> StoreResult<PathBuf> {
        let (first, second) = shard_prefixes(digest)?;
        Ok(self.objects_root().join(first).join(second).join(digest))
    }

    fn reference(&self, digest: &str, size: u64) -> StoreResult<ContentReference> {
        let relative = relative_object_path(&self.objects_dir, digest)?;
        Ok(ContentReference::new(digest, relative, size))
    }
}

impl ContentStore for FsContentStore {
    fn exists(&self, digest: &str) -> bool {
        match self.locate(digest) {
            Ok(path) => path.is_file(),
            Err(_) => false,
        }
    }

    fn store(&self, bytes: &[u8], digest: &str) -> StoreResult<ContentReference> {
        let path = self.locate(digest)?;
        let reference = self.reference(digest, bytes.len() as u64)?;

        if path.is_file() {
            debug!(digest = %reference.short_digest(), "object already present");
            return Ok(reference);
        }

        let shard = path
            .parent()
            .ok_or_else(|| StoreError::Io(io::Error::other("object path has no parent")))?;
        // Tolerates a concurrent writer creating the same shard directory.
        fs::create_dir_all(shard)?;

        let mut tmp = NamedTempFile::new_in(shard)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(digest = %reference.short_digest(), size = bytes.len(), "object stored");
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                // Only a regular file at the object path counts as the object.
                if !path.is_file() {
                    return Err(StoreError::Io(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} is occupied by a non-file entry", path.display()),
                    )));
                }
                debug!(digest = %reference.short_digest(), "object stored concurrently");
            }
            Err(e) => return Err(StoreError::Io(e.error)),
        }
        Ok(reference)
    }

    fn load(&self, digest: &str) -> StoreResult<Vec<u8>> {
        let path = self.locate(digest)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(digest.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_crypto::ContentHasher;
    use museum_types::ErrorKind;

    fn temp_store() -> (tempfile::TempDir, FsContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::new(dir.path());
        (dir, store)
    }

    fn count_files(dir: &Path) -> usize {
        let mut count = 0;
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                count += count_files(&entry.path());
            } else {
                count += 1;
            }
        }
        count
    }

    // -----------------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------------

    #[test]
    fn locate_rejects_short_digest() {
        let (_dir, store) = temp_store();
        let err = store.locate("ab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn locate_nests_under_two_levels() {
        let (dir, store) = temp_store();
        let digest = ContentHasher::digest(b"photo");
        let path = store.locate(&digest).unwrap();
        let expected = dir
            .path()
            .join("Objects")
            .join(&digest[0..2])
            .join(&digest[2..4])
            .join(&digest);
        assert_eq!(path, expected);
    }

    #[test]
    fn custom_objects_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::with_objects_dir(dir.path(), "blobs");
        let reference = store.store_bytes(b"x").unwrap();
        assert!(reference.relative_path.starts_with("blobs/"));
        assert!(dir.path().join(&reference.relative_path).is_file());
    }

    // -----------------------------------------------------------------------
    // Store / load
    // -----------------------------------------------------------------------

    #[test]
    fn store_and_load() {
        let (dir, store) = temp_store();
        let data = b"0123456789";
        let digest = ContentHasher::digest(data);
        let reference = store.store(data, &digest).unwrap();

        assert_eq!(reference.digest, digest);
        assert_eq!(reference.size_bytes, 10);
        assert_eq!(
            reference.relative_path,
            format!("Objects/{}/{}/{}", &digest[0..2], &digest[2..4], digest)
        );
        assert!(dir.path().join(&reference.relative_path).is_file());
        assert_eq!(store.load(&digest).unwrap(), data);
    }

    #[test]
    fn store_is_idempotent() {
        let (dir, store) = temp_store();
        let data = b"same photo twice";
        let digest = ContentHasher::digest(data);
        let first = store.store(data, &digest).unwrap();
        let second = store.store(data, &digest).unwrap();
        assert_eq!(first, second);
        assert_eq!(count_files(&dir.path().join("Objects")), 1);
    }

    #[test]
    fn first_store_wins() {
        let (_dir, store) = temp_store();
        let digest = "abcd".repeat(16);
        store.store(b"first", &digest).unwrap();
        store.store(b"second", &digest).unwrap();
        assert_eq!(store.load(&digest).unwrap(), b"first");
    }

    #[test]
    fn store_rejects_malformed_digest() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.store(b"x", "../../etc"),
            Err(StoreError::InvalidDigest(_))
        ));
    }

    #[test]
    fn store_over_directory_fails() {
        let (_dir, store) = temp_store();
        let digest = ContentHasher::digest(b"hello");
        fs::create_dir_all(store.locate(&digest).unwrap()).unwrap();

        let err = store.store(b"hello", &digest).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!store.exists(&digest));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (dir, store) = temp_store();
        let reference = store.store_bytes(b"clean").unwrap();
        let shard = dir.path().join(&reference.relative_path);
        let shard_dir = shard.parent().unwrap();
        let names: Vec<_> = fs::read_dir(shard_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(&reference.digest)]);
    }

    #[test]
    fn load_missing_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store.load(&"ab".repeat(32)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // Exists
    // -----------------------------------------------------------------------

    #[test]
    fn exists_tracks_store() {
        let (_dir, store) = temp_store();
        let digest = ContentHasher::digest(b"clip");
        assert!(!store.exists(&digest));
        store.store(b"clip", &digest).unwrap();
        assert!(store.exists(&digest));
    }

    #[test]
    fn exists_swallows_malformed_digest() {
        let (_dir, store) = temp_store();
        assert!(!store.exists("ab"));
        assert!(!store.exists("not hex at all"));
    }

    // -----------------------------------------------------------------------
    // Ingest / verify
    // -----------------------------------------------------------------------

    #[test]
    fn ingest_hashes_file() {
        let (dir, store) = temp_store();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"id3 tag and frames").unwrap();

        let reference = store.ingest(&file).unwrap();
        assert_eq!(reference.digest, ContentHasher::digest(b"id3 tag and frames"));
        assert_eq!(reference.size_bytes, 18);
        assert!(store.exists(&reference.digest));
    }

    #[test]
    fn ingest_missing_file_is_io_error() {
        let (dir, store) = temp_store();
        let err = store.ingest(&dir.path().join("missing.jpg")).unwrap_err();
        assert!(matches!(err, StoreError::Ingest { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn verify_detects_corruption() {
        let (_dir, store) = temp_store();
        let reference = store.store_bytes(b"pristine").unwrap();
        store.verify(&reference.digest).unwrap();

        let path = store.locate(&reference.digest).unwrap();
        fs::write(&path, b"bitrot").unwrap();
        assert!(matches!(
            store.verify(&reference.digest),
            Err(StoreError::HashMismatch { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_stores_share_shards() {
        use std::sync::Arc;
        use std::thread;

        let (dir, store) = temp_store();
        let store = Arc::new(store);
        // Same shard prefix, different digests, plus duplicate writers.
        let digests: Vec<String> = (0..8).map(|i| format!("abcd{:060x}", i % 4)).collect();

        let handles: Vec<_> = digests
            .iter()
            .cloned()
            .map(|digest| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.store(digest.as_bytes(), &digest).unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        assert_eq!(count_files(&dir.path().join("Objects")), 4);
    }

    proptest::proptest! {
        #[test]
        fn locate_is_pure(digest in "[0-9a-f]{4,64}") {
            let store = FsContentStore::new("/library");
            let a = store.locate(&digest).unwrap();
            let b = FsContentStore::new("/library").locate(&digest).unwrap();
            proptest::prop_assert_eq!(&a, &b);
            let relative = a.strip_prefix("/library/Objects").unwrap();
            proptest::prop_assert_eq!(relative.components().count(), 3);
        }
    }
}
