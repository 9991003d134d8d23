use museum_types::StableId;
use serde::{Deserialize, Serialize};

/// A top-level organizational unit of a library.
///
/// Each wing owns `Wings/<id>/Exhibits` on disk. `id` must be unique within a
/// library; [`LibraryIndex::validate`](crate::LibraryIndex::validate) enforces
/// this on every write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wing {
    pub id: StableId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<Vec<String>>,
}

impl Wing {
    /// A wing with no description, categories, or sharing.
    pub fn new(id: StableId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            categories: Vec::new(),
            shared_with: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_shared_with(mut self, shared_with: Vec<String>) -> Self {
        self.shared_with = Some(shared_with);
        self
    }
}
