//! Deterministic tar serialization of a directory tree.
//!
//! Entries are appended in sorted name order with normalized metadata
//! (fixed mtime, zero owner, canonical modes), so the same tree always yields
//! the same bytes. Symlinks are stored as links and never followed.

use std::io::{self, Read};
use std::path::Path;

use tar::{Archive, Builder, HeaderMode};
use walkdir::WalkDir;

/// Serialize everything below `root` (not `root` itself) into a tar stream.
pub fn pack_tree(root: &Path) -> io::Result<Vec<u8>> {
    let mut builder = Builder::new(Vec::new());
    builder.mode(HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?;
        builder.append_path_with_name(entry.path(), relative)?;
    }

    builder.into_inner()
}

/// Unpack a stream produced by [`pack_tree`] into `dest`.
///
/// Entries that would escape `dest` are skipped by the tar reader.
pub fn unpack_tree<R: Read>(reader: R, dest: &Path) -> io::Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_overwrite(false);
    archive.unpack(dest)
}
