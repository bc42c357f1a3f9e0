//! Folder records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Folder record from the database.
///
/// `parent` is the id of another folder in the same hierarchy, or None for
/// a root-level folder. The parent relation forms a forest: the hierarchy
/// service rejects any mutation that would introduce a cycle.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub created_at: String,
}

/// Input for inserting a new folder.
#[derive(Debug, Clone)]
pub struct CreateFolder {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub created_at: String,
}
