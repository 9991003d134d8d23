//! Foundation types for the museum media library.
//!
//! Every other museum crate depends on `museum-types`. It holds the small,
//! immutable value types that cross crate boundaries and the error taxonomy
//! shared by all layers.
//!
//! # Key Types
//!
//! - [`StableId`] — Caller-assigned durable identifier, safe as a path segment
//! - [`ContentReference`] — Result of storing a blob in the content-addressed store
//! - [`ErrorKind`] — Coarse error category every crate's error maps onto
//! - [`validate_digest`] — Shape check for hex digests used as storage keys

pub mod digest;
pub mod error;
pub mod id;
pub mod reference;

pub use digest::{validate_digest, MIN_DIGEST_LEN};
pub use error::{ErrorKind, TypeError};
pub use id::StableId;
pub use reference::ContentReference;
