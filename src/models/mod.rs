//! Domain models for Linkstash.

mod folder;
mod link;

pub use folder::*;
pub use link::*;

/// Which of the two parallel folder/link trees an operation targets.
///
/// Both hierarchies share one schema shape; the kind selects the table
/// pair so a single service implementation can serve either tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyKind {
    Saved,
    Image,
}

impl HierarchyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Image => "image",
        }
    }

    /// Folder table for this hierarchy.
    pub fn folder_table(&self) -> &'static str {
        match self {
            Self::Saved => "saved_folders",
            Self::Image => "image_folders",
        }
    }

    /// Link table for this hierarchy.
    pub fn link_table(&self) -> &'static str {
        match self {
            Self::Saved => "saved_links",
            Self::Image => "image_links",
        }
    }
}

impl std::fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
