use serde::{Deserialize, Serialize};

/// Handle returned by every successful store or ingest.
///
/// `relative_path` is fully determined by `digest` and is relative to the
/// store root, always using `/` separators. `size_bytes` is the exact length
/// of the stored content. References are not persisted by the store; callers
/// keep them in metadata they own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReference {
    pub digest: String,
    pub relative_path: String,
    pub size_bytes: u64,
}

impl ContentReference {
    pub fn new(
        digest: impl Into<String>,
        relative_path: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            digest: digest.into(),
            relative_path: relative_path.into(),
            size_bytes,
        }
    }

    /// Short digest (first 8 characters) for log lines and CLI output.
    pub fn short_digest(&self) -> &str {
        let end = self.digest.len().min(8);
        self.digest.get(..end).unwrap_or(&self.digest)
    }
}
