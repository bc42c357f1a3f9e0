//! Hierarchy service: folder CRUD, containment queries, and the
//! cascade/migrate delete.
//!
//! One instance is bound per hierarchy kind (saved or image); all logic is
//! identical across kinds. Tree walks (descendant closure, ancestor chain)
//! are iterative with an explicit work list, so stack depth stays bounded
//! no matter how deep a tree gets.

use std::collections::{HashSet, VecDeque};

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::models::{CreateFolder, CreateLink, Folder, HierarchyKind, Link};
use crate::{Error, Result};

/// Service for one folder/link hierarchy.
#[derive(Clone)]
pub struct HierarchyService {
    db: DbPool,
    kind: HierarchyKind,
}

/// A folder with its parent record resolved.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FolderWithParent {
    pub folder: Folder,
    pub parent: Option<Folder>,
}

/// One level of a folder's contents plus the resolved parent.
#[derive(Debug, Clone)]
pub struct FolderDetail {
    pub folder: Folder,
    pub parent: Option<Folder>,
    pub subfolders: Vec<Folder>,
    pub links: Vec<Link>,
}

/// Input for creating a link.
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub url: String,
    pub folder: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl HierarchyService {
    /// Create a service bound to one hierarchy kind.
    pub fn new(db: DbPool, kind: HierarchyKind) -> Self {
        Self { db, kind }
    }

    // ========================================================================
    // Folder queries
    // ========================================================================

    /// List direct children of `parent`, or root folders when None.
    /// Newest first.
    pub async fn list_folders(&self, parent: Option<&str>) -> Result<Vec<Folder>> {
        db::list_child_folders(&self.db, self.kind, parent).await
    }

    /// Containment query: all links under a branch of the tree.
    ///
    /// With no parent this returns only root-level links. With a parent it
    /// resolves the full descendant closure (the folder plus everything
    /// transitively below it) and returns every link owned by any folder in
    /// that closure, newest first.
    pub async fn list_contained_links(&self, parent: Option<&str>) -> Result<Vec<Link>> {
        let Some(parent) = parent else {
            return db::list_links_by_folder(&self.db, self.kind, None).await;
        };

        let mut conn = self.db.acquire().await?;
        let closure = self.collect_subtree(&mut conn, parent).await?;
        drop(conn);

        db::list_links_in_folders(&self.db, self.kind, &closure).await
    }

    /// One level of a folder's contents: the folder itself (parent record
    /// resolved), its direct subfolders, and its direct links.
    pub async fn folder_detail(&self, id: &str) -> Result<FolderDetail> {
        let folder = self.require_folder(id).await?;
        let parent = self.resolve_parent(&folder).await?;
        let subfolders = db::list_child_folders(&self.db, self.kind, Some(id)).await?;
        let links = db::list_links_by_folder(&self.db, self.kind, Some(id)).await?;

        Ok(FolderDetail {
            folder,
            parent,
            subfolders,
            links,
        })
    }

    /// Breadcrumb path for a folder: ancestor chain from the root down to
    /// the folder itself.
    pub async fn folder_path(&self, id: &str) -> Result<Vec<Folder>> {
        let folder = self.require_folder(id).await?;

        let mut chain = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = Some(folder);

        while let Some(f) = current {
            // Guard against malformed parent loops in stored data
            if !seen.insert(f.id.clone()) {
                break;
            }
            let parent_id = f.parent.clone();
            chain.push(f);
            current = match parent_id {
                Some(pid) => db::get_folder(&self.db, self.kind, &pid).await?,
                None => None,
            };
        }

        chain.reverse();
        Ok(chain)
    }

    // ========================================================================
    // Folder mutations
    // ========================================================================

    /// Create a folder under `parent` (root when None).
    ///
    /// Sibling names must be unique; the parent id is only checked
    /// syntactically, not for existence.
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("folder name is required".into()));
        }
        if let Some(parent) = parent {
            ensure_valid_id(parent, "parent folder")?;
        }

        if db::find_folder_by_name(&self.db, self.kind, name, parent)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "a folder named '{}' already exists here",
                name
            )));
        }

        let folder = db::insert_folder(
            &self.db,
            self.kind,
            CreateFolder {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                parent: parent.map(str::to_string),
                created_at: now_rfc3339(),
            },
        )
        .await?;

        info!(kind = %self.kind, id = %folder.id, "folder created");
        Ok(folder)
    }

    /// Rename a folder and/or move it under a new parent (root when None).
    ///
    /// Rejects self-parenting and any move that would create a cycle, i.e.
    /// moving a folder under its own descendant. The cycle check walks the
    /// candidate parent's ancestor chain upward: if it ever reaches the
    /// folder being moved, the move is circular.
    pub async fn update_folder(
        &self,
        id: &str,
        name: &str,
        parent: Option<&str>,
    ) -> Result<FolderWithParent> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("folder name is required".into()));
        }

        if let Some(parent) = parent {
            if parent == id {
                return Err(Error::Validation(
                    "a folder cannot be its own parent".into(),
                ));
            }
            ensure_valid_id(parent, "parent folder")?;
            self.ensure_not_descendant(id, parent).await?;
        }

        let folder = db::update_folder(&self.db, self.kind, id, name, parent)
            .await?
            .ok_or_else(|| Error::NotFound(format!("folder not found: {}", id)))?;

        let parent = self.resolve_parent(&folder).await?;
        info!(kind = %self.kind, id = %folder.id, "folder updated");

        Ok(FolderWithParent { folder, parent })
    }

    /// Delete a folder, either cascading through its subtree or migrating
    /// its direct contents to another folder.
    ///
    /// Cascade mode (no destination) removes the folder, every descendant
    /// folder, and every link owned by any of them, children before
    /// parents. Migrate mode reparents only the folder's *direct* child
    /// folders and direct links to the destination; grandchildren keep
    /// their parents. The destination must lie outside the folder's own
    /// subtree, or the surviving contents would be orphaned or form a
    /// cycle. Either way the folder itself is deleted last and the whole
    /// operation is one transaction.
    pub async fn delete_folder(&self, id: &str, move_contents_to: Option<&str>) -> Result<()> {
        self.require_folder(id).await?;

        if let Some(dest) = move_contents_to {
            if dest == id {
                return Err(Error::Validation(
                    "destination folder cannot be the folder being deleted".into(),
                ));
            }
            ensure_valid_id(dest, "destination folder")?;
            self.ensure_not_descendant(id, dest).await?;
        }

        let mut tx = self.db.begin().await?;

        match move_contents_to {
            Some(dest) => {
                let folders_moved =
                    db::reparent_child_folders(&mut *tx, self.kind, id, dest).await?;
                let links_moved = db::reparent_links(&mut *tx, self.kind, id, dest).await?;
                info!(
                    kind = %self.kind,
                    id,
                    dest,
                    folders_moved,
                    links_moved,
                    "folder contents migrated"
                );
            }
            None => {
                // Collect inside the transaction so the closure matches
                // exactly what gets deleted.
                let subtree = self.collect_subtree(&mut tx, id).await?;
                db::delete_links_in_folders(&mut *tx, self.kind, &subtree).await?;

                // The subtree is in parents-before-children order; deleting
                // in reverse removes children before their parent.
                for folder_id in subtree.iter().skip(1).rev() {
                    db::delete_folder_row(&mut *tx, self.kind, folder_id).await?;
                }

                info!(kind = %self.kind, id, folders = subtree.len(), "folder subtree deleted");
            }
        }

        db::delete_folder_row(&mut *tx, self.kind, id).await?;
        tx.commit().await?;

        Ok(())
    }

    // ========================================================================
    // Link operations
    // ========================================================================

    /// List links directly owned by `folder` (root-level when None),
    /// newest first. Single-level, unlike the containment query.
    pub async fn list_links(&self, folder: Option<&str>) -> Result<Vec<Link>> {
        db::list_links_by_folder(&self.db, self.kind, folder).await
    }

    /// Create a link, optionally inside a folder. The folder must exist.
    pub async fn create_link(&self, input: NewLink) -> Result<Link> {
        let url = input.url.trim();
        if url.is_empty() {
            return Err(Error::Validation("link url is required".into()));
        }

        if let Some(folder) = &input.folder {
            ensure_valid_id(folder, "folder")?;
            if db::get_folder(&self.db, self.kind, folder).await?.is_none() {
                return Err(Error::NotFound(format!("folder not found: {}", folder)));
            }
        }

        let tags = input.tags.map(|t| serde_json::to_string(&t)).transpose()?;

        let link = db::insert_link(
            &self.db,
            self.kind,
            CreateLink {
                id: Uuid::new_v4().to_string(),
                url: url.to_string(),
                folder: input.folder,
                description: input.description,
                tags,
                created_at: now_rfc3339(),
            },
        )
        .await?;

        info!(kind = %self.kind, id = %link.id, "link created");
        Ok(link)
    }

    /// Delete a link by id.
    pub async fn delete_link(&self, id: &str) -> Result<()> {
        if !db::delete_link_row(&self.db, self.kind, id).await? {
            return Err(Error::NotFound(format!("link not found: {}", id)));
        }
        info!(kind = %self.kind, id, "link deleted");
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn require_folder(&self, id: &str) -> Result<Folder> {
        db::get_folder(&self.db, self.kind, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("folder not found: {}", id)))
    }

    async fn resolve_parent(&self, folder: &Folder) -> Result<Option<Folder>> {
        match &folder.parent {
            Some(pid) => db::get_folder(&self.db, self.kind, pid).await,
            None => Ok(None),
        }
    }

    /// Collect `root` plus all folders transitively below it, in
    /// parents-before-children (breadth-first) order.
    async fn collect_subtree(
        &self,
        conn: &mut SqliteConnection,
        root: &str,
    ) -> Result<Vec<String>> {
        let mut order = vec![root.to_string()];
        let mut seen: HashSet<String> = order.iter().cloned().collect();
        let mut queue: VecDeque<String> = order.iter().cloned().collect();

        while let Some(current) = queue.pop_front() {
            let children = db::list_child_folders(&mut *conn, self.kind, Some(&current)).await?;
            for child in children {
                if seen.insert(child.id.clone()) {
                    order.push(child.id.clone());
                    queue.push_back(child.id);
                }
            }
        }

        Ok(order)
    }

    /// Reject `candidate` when it sits inside `id`'s subtree. Used both
    /// for reparenting and for migrate-delete destinations. Walks upward
    /// from the candidate; reaching `id` means the relation would close a
    /// cycle.
    async fn ensure_not_descendant(&self, id: &str, candidate: &str) -> Result<()> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = Some(candidate.to_string());

        while let Some(folder_id) = current {
            if folder_id == id {
                return Err(Error::Conflict("circular reference detected".into()));
            }
            if !seen.insert(folder_id.clone()) {
                break;
            }
            current = db::get_folder(&self.db, self.kind, &folder_id)
                .await?
                .and_then(|f| f.parent);
        }

        Ok(())
    }
}

/// Current timestamp in the storage format. Millisecond precision keeps
/// newest-first ordering stable across quick successive inserts.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Check that an id is syntactically valid before it is used in a query.
fn ensure_valid_id(id: &str, field: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| Error::Validation(format!("invalid {} id: {}", field, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("550e8400-e29b-41d4-a716-446655440000", true)]
    #[case("not-an-id", false)]
    #[case("", false)]
    #[case("550e8400e29b41d4a716446655440000", true)]
    fn test_ensure_valid_id(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(ensure_valid_id(id, "parent folder").is_ok(), ok);
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let a = now_rfc3339();
        let b = now_rfc3339();
        assert!(a <= b);
    }
}
