//! Catalog records shared by the store, the submission pipeline, the
//! renderer and the CLI output.
//!
//! These types are the on-disk JSON shape: field names and ordering here
//! are the document format. Unknown keys are refused rather than dropped,
//! so a hand-edited document never loses data on the next write.

use serde::{Deserialize, Serialize};

/// Top-level JSON document: a single object holding every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    pub categories: Vec<Category>,
}

/// A named collection of entries, addressed by its `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    /// Slug-like routing key, unique within the document.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Most recent first; submissions are prepended.
    pub tools: Vec<Entry>,
}

/// A single catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub name: String,
    pub description: String,
    /// Public-relative asset path, e.g. `/uploads/midjourney-1700000000000.png`.
    pub image: String,
    pub url: String,
    /// Absent from the JSON when there is no prompt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Entry {
    /// Card action label used by listings.
    pub fn action_label(&self) -> &'static str {
        if self.prompt.is_some() {
            "View prompt"
        } else {
            "View details"
        }
    }
}
