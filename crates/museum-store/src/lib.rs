//! Content-addressed object storage for the museum media library.
//!
//! Binary media (images, video, audio) is stored once per distinct content,
//! at a location derived purely from its hex digest:
//!
//! ```text
//! <root>/<objects>/<digest[0..2]>/<digest[2..4]>/<digest>
//! ```
//!
//! The two-level fan-out caps each directory at 256 entries per level
//! (65,536 leaf directories) without a separate index.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`FsContentStore`] -- sharded directory tree on local disk
//! - [`InMemoryContentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; the first store wins.
//! 2. Writes are atomic: an object file is never visible half-written.
//! 3. Storing the same digest twice is a no-op that returns the same reference.
//! 4. Nothing is ever deleted: there is no eviction or garbage collection.
//! 5. The store never interprets object contents.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod shard;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsContentStore;
pub use memory::InMemoryContentStore;
pub use shard::{relative_object_path, DEFAULT_OBJECTS_DIR};
pub use traits::ContentStore;
