//! Library index for the museum media library.
//!
//! The index is a single JSON manifest (`museum.json`) at the library root
//! describing the library's wings. It is the one authoritative record of a
//! library's structure and is always rewritten in full: there is no merge
//! and no transaction log, so callers read, modify, and write it back.
//!
//! Encoding is deterministic: keys are sorted, timestamps use a fixed
//! RFC 3339 UTC form with second precision, and the file ends in a newline,
//! which keeps manifests diffable and backups reproducible.
//!
//! # Key Types
//!
//! - [`LibraryIndex`] -- The manifest: format version, creation time, wings
//! - [`Wing`] -- A top-level organizational unit
//! - [`read_index`] / [`write_index`] -- Manifest persistence

pub mod error;
pub mod index;
pub mod manifest;
pub mod timestamp;
pub mod wing;

pub use error::{IndexError, IndexResult};
pub use index::{LibraryIndex, FORMAT_VERSION};
pub use manifest::{manifest_path, read_index, write_index, MANIFEST_FILE_NAME};
pub use wing::Wing;
