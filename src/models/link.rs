//! Link records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Link record from the database.
///
/// `folder` is the owning folder id, or None for a root-level link.
/// `tags` is a JSON array of strings, used by the image hierarchy.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub url: String,
    pub folder: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub created_at: String,
}

impl Link {
    /// Decode the stored tag set.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_ref()
            .and_then(|t| serde_json::from_str(t).ok())
            .unwrap_or_default()
    }
}

/// Input for inserting a new link.
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub id: String,
    pub url: String,
    pub folder: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub created_at: String,
}
