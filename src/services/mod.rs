//! Business logic services for Linkstash.

mod hierarchy;

pub use hierarchy::{FolderDetail, FolderWithParent, HierarchyService, NewLink};
