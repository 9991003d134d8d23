//! The museum library: a directory tree of wings, their installed exhibits,
//! a content-addressed object store, and the manifest describing them.
//!
//! ```text
//! <root>/
//!   museum.json                      manifest (see museum-index)
//!   .museum.lock                     advisory lock for manifest updates
//!   Wings/<wing-id>/Exhibits/<name>.<bundle-extension>
//!   Objects/<aa>/<bb>/<digest>       content-addressed blobs
//! ```
//!
//! All operations are synchronous and run on the caller's thread. Manifest
//! read-modify-write (`add_wing`) and backup hold an advisory file lock so
//! that cooperating processes do not lose updates; `install` and object
//! stores do not lock.
//!
//! Backups serialize the entire root tree into a deterministic tar stream and
//! seal it with `museum-crypto`; restore reverses that into a fresh
//! directory, keeping all intermediate plaintext in scoped temp files.

pub mod archive;
pub mod backup;
pub mod bundle;
pub mod config;
pub mod error;
pub mod layout;
pub mod library;
pub mod lock;

pub use bundle::{Bundle, PathBundle};
pub use config::LibraryConfig;
pub use error::{LibraryError, LibraryResult};
pub use layout::{EXHIBITS_DIR, LOCK_FILE_NAME, WINGS_DIR};
pub use library::MuseumLibrary;

// Re-export key types
pub use museum_crypto::BackupKey;
pub use museum_index::{LibraryIndex, Wing};
pub use museum_store::{ContentStore, FsContentStore};
pub use museum_types::{ContentReference, ErrorKind, StableId};
