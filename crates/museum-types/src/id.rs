use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters that may not appear in a stable identifier.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Durable, caller-chosen identifier for cross references (wings, assets).
///
/// A `StableId` never changes once assigned, unlike a display name. Because
/// wing ids name directories on disk, construction rejects anything that is
/// not a single safe path segment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StableId(String);

impl StableId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidId {
                id,
                reason: "identifier must not be empty".into(),
            });
        }
        if id == "." || id == ".." {
            return Err(TypeError::InvalidId {
                id,
                reason: "identifier must not be a relative path component".into(),
            });
        }
        if let Some(ch) = id.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(TypeError::InvalidId {
                reason: format!("contains forbidden character: {ch:?}"),
                id,
            });
        }
        Ok(Self(id))
    }

    /// The wrapped string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StableId({})", self.0)
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StableId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StableId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StableId> for String {
    fn from(id: StableId) -> Self {
        id.0
    }
}
