//! The in-memory library manifest.

use std::collections::BTreeSet;

use chrono::{DateTime, SubsecRound, Utc};
use museum_types::StableId;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::wing::Wing;

/// Manifest format version written by this build.
pub const FORMAT_VERSION: &str = "1.0";

/// The library manifest: format version, creation time, and ordered wings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryIndex {
    pub format_version: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    pub wings: Vec<Wing>,
}

impl LibraryIndex {
    /// A fresh manifest stamped with the current time (whole seconds).
    pub fn new(wings: Vec<Wing>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            created_at: Utc::now().trunc_subsecs(0),
            wings,
        }
    }

    /// Number of wings.
    pub fn len(&self) -> usize {
        self.wings.len()
    }

    /// Returns `true` if the library has no wings.
    pub fn is_empty(&self) -> bool {
        self.wings.is_empty()
    }

    /// Look up a wing by id.
    pub fn wing(&self, id: &StableId) -> Option<&Wing> {
        self.wings.iter().find(|w| &w.id == id)
    }

    /// Returns `true` if a wing with `id` exists.
    pub fn contains(&self, id: &StableId) -> bool {
        self.wing(id).is_some()
    }

    /// Append a wing, rejecting a duplicate id.
    pub fn add_wing(&mut self, wing: Wing) -> IndexResult<()> {
        if self.contains(&wing.id) {
            return Err(IndexError::DuplicateWing(wing.id));
        }
        self.wings.push(wing);
        Ok(())
    }

    /// Check structural invariants: a supported format version and unique
    /// wing ids.
    pub fn validate(&self) -> IndexResult<()> {
        let major = self.format_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(IndexError::UnsupportedVersion(self.format_version.clone()));
        }
        let mut seen = BTreeSet::new();
        for wing in &self.wings {
            if !seen.insert(&wing.id) {
                return Err(IndexError::DuplicateWing(wing.id.clone()));
            }
        }
        Ok(())
    }
}
