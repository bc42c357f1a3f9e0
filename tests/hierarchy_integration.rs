//! Integration tests for the hierarchy service.
//!
//! Exercises folder trees, containment queries, cycle prevention, and the
//! cascade/migrate delete against an in-memory SQLite database.

use linkstash::db::{self, DbPool};
use linkstash::models::{Folder, HierarchyKind, Link};
use linkstash::services::{HierarchyService, NewLink};
use linkstash::Error;
use uuid::Uuid;

// ============================================================================
// Test Setup Helpers
// ============================================================================

/// Create a test database with the schema applied.
async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

async fn setup_service() -> (DbPool, HierarchyService) {
    let pool = setup_test_db().await;
    let service = HierarchyService::new(pool.clone(), HierarchyKind::Saved);
    (pool, service)
}

async fn folder(service: &HierarchyService, name: &str, parent: Option<&str>) -> Folder {
    service
        .create_folder(name, parent)
        .await
        .expect("Failed to create folder")
}

async fn link(service: &HierarchyService, url: &str, folder: Option<&str>) -> Link {
    service
        .create_link(NewLink {
            url: url.to_string(),
            folder: folder.map(str::to_string),
            ..Default::default()
        })
        .await
        .expect("Failed to create link")
}

// ============================================================================
// Containment Queries
// ============================================================================

/// list_contained_links returns exactly the union of links owned by a folder
/// and every folder in its descendant set, never links from other branches.
#[tokio::test]
async fn test_containment_query_covers_branch_only() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;
    let other = folder(&service, "other", None).await;

    let in_a = link(&service, "http://a", Some(&a.id)).await;
    let in_b = link(&service, "http://b", Some(&b.id)).await;
    let in_c = link(&service, "http://c", Some(&c.id)).await;
    let _in_other = link(&service, "http://other", Some(&other.id)).await;
    let _at_root = link(&service, "http://root", None).await;

    let links = service.list_contained_links(Some(&a.id)).await.unwrap();
    let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();

    assert_eq!(links.len(), 3);
    assert!(ids.contains(&in_a.id.as_str()));
    assert!(ids.contains(&in_b.id.as_str()));
    assert!(ids.contains(&in_c.id.as_str()));
}

/// Without a parent, the containment query returns only root-level links.
#[tokio::test]
async fn test_containment_query_root_level() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let _nested = link(&service, "http://nested", Some(&a.id)).await;
    let at_root = link(&service, "http://root", None).await;

    let links = service.list_contained_links(None).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, at_root.id);
}

// ============================================================================
// Folder Creation
// ============================================================================

/// Duplicate sibling names conflict; the same name under a different
/// parent is fine.
#[tokio::test]
async fn test_sibling_name_uniqueness() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", None).await;

    folder(&service, "docs", Some(&a.id)).await;

    let duplicate = service.create_folder("docs", Some(&a.id)).await;
    assert!(matches!(duplicate, Err(Error::Conflict(_))));

    // Same name elsewhere succeeds
    folder(&service, "docs", Some(&b.id)).await;
    folder(&service, "docs", None).await;

    // Root level is a sibling scope too
    let root_duplicate = service.create_folder("docs", None).await;
    assert!(matches!(root_duplicate, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_create_folder_validation() {
    let (_pool, service) = setup_service().await;

    let empty = service.create_folder("", None).await;
    assert!(matches!(empty, Err(Error::Validation(_))));

    let blank = service.create_folder("   ", None).await;
    assert!(matches!(blank, Err(Error::Validation(_))));

    let bad_parent = service.create_folder("a", Some("not-a-valid-id")).await;
    assert!(matches!(bad_parent, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_list_folders_newest_first() {
    let (_pool, service) = setup_service().await;

    let first = folder(&service, "first", None).await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = folder(&service, "second", None).await;

    let roots = service.list_folders(None).await.unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].id, second.id);
    assert_eq!(roots[1].id, first.id);
}

// ============================================================================
// Rename / Move
// ============================================================================

/// Moving a folder under its own descendant is rejected at any depth.
#[tokio::test]
async fn test_move_rejects_cycles() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;

    // Direct child
    let direct = service.update_folder(&a.id, "a", Some(&b.id)).await;
    assert!(matches!(direct, Err(Error::Conflict(_))));

    // Two levels down
    let deep = service.update_folder(&a.id, "a", Some(&c.id)).await;
    assert!(matches!(deep, Err(Error::Conflict(_))));

    // Self-parenting is a validation error
    let own = service.update_folder(&a.id, "a", Some(&a.id)).await;
    assert!(matches!(own, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_move_to_sibling_branch() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let g = folder(&service, "g", None).await;

    let moved = service.update_folder(&b.id, "b", Some(&g.id)).await.unwrap();
    assert_eq!(moved.folder.parent.as_deref(), Some(g.id.as_str()));
    assert_eq!(moved.parent.as_ref().map(|p| p.id.as_str()), Some(g.id.as_str()));
}

#[tokio::test]
async fn test_rename_and_move_to_root() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;

    let renamed = service.update_folder(&b.id, "renamed", None).await.unwrap();
    assert_eq!(renamed.folder.name, "renamed");
    assert_eq!(renamed.folder.parent, None);
    assert!(renamed.parent.is_none());
}

#[tokio::test]
async fn test_update_missing_folder_not_found() {
    let (_pool, service) = setup_service().await;

    let missing = Uuid::new_v4().to_string();
    let result = service.update_folder(&missing, "x", None).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// ============================================================================
// Cascade Delete
// ============================================================================

/// Cascade delete removes the folder, every descendant folder, and every
/// link owned by any of them.
#[tokio::test]
async fn test_cascade_delete_removes_subtree() {
    let (pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;
    let survivor = folder(&service, "survivor", None).await;

    let la = link(&service, "http://a", Some(&a.id)).await;
    let lc = link(&service, "http://c", Some(&c.id)).await;
    let ls = link(&service, "http://s", Some(&survivor.id)).await;

    service.delete_folder(&a.id, None).await.unwrap();

    let kind = HierarchyKind::Saved;
    for id in [&a.id, &b.id, &c.id] {
        assert!(db::get_folder(&pool, kind, id).await.unwrap().is_none());
    }
    for id in [&la.id, &lc.id] {
        assert!(db::get_link(&pool, kind, id).await.unwrap().is_none());
    }

    // The unrelated branch is untouched
    assert!(db::get_folder(&pool, kind, &survivor.id).await.unwrap().is_some());
    assert!(db::get_link(&pool, kind, &ls.id).await.unwrap().is_some());
}

/// Scenario from the original behavior: nested folder with a link, then
/// cascade delete from the root of the branch.
#[tokio::test]
async fn test_cascade_delete_scenario() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "A", None).await;
    let b = folder(&service, "B", Some(&a.id)).await;
    let l = link(&service, "http://x", Some(&b.id)).await;

    let contained = service.list_contained_links(Some(&a.id)).await.unwrap();
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].id, l.id);

    service.delete_folder(&a.id, None).await.unwrap();

    let roots = service.list_folders(None).await.unwrap();
    assert!(roots.iter().all(|f| f.name != "A"));
    assert!(service.list_contained_links(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_folder_not_found() {
    let (_pool, service) = setup_service().await;

    let missing = Uuid::new_v4().to_string();
    let result = service.delete_folder(&missing, None).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// ============================================================================
// Migrate Delete
// ============================================================================

/// Migrate mode moves only the folder's direct children and direct links;
/// grandchildren keep their original parents.
#[tokio::test]
async fn test_migrate_delete_is_shallow() {
    let (pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;
    let g = folder(&service, "g", None).await;

    let direct_link = link(&service, "http://direct", Some(&a.id)).await;
    let deep_link = link(&service, "http://deep", Some(&b.id)).await;

    service.delete_folder(&a.id, Some(&g.id)).await.unwrap();

    let kind = HierarchyKind::Saved;

    // A is gone; B now lives under G
    assert!(db::get_folder(&pool, kind, &a.id).await.unwrap().is_none());
    let b = db::get_folder(&pool, kind, &b.id).await.unwrap().unwrap();
    assert_eq!(b.parent.as_deref(), Some(g.id.as_str()));

    // Grandchild C still lives under B
    let c = db::get_folder(&pool, kind, &c.id).await.unwrap().unwrap();
    assert_eq!(c.parent.as_deref(), Some(b.id.as_str()));

    // A's direct link moved to G; B's link stayed with B
    let direct = db::get_link(&pool, kind, &direct_link.id).await.unwrap().unwrap();
    assert_eq!(direct.folder.as_deref(), Some(g.id.as_str()));
    let deep = db::get_link(&pool, kind, &deep_link.id).await.unwrap().unwrap();
    assert_eq!(deep.folder.as_deref(), Some(b.id.as_str()));
}

#[tokio::test]
async fn test_migrate_delete_rejects_invalid_destination() {
    let (pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;

    let result = service.delete_folder(&a.id, Some("not-a-valid-id")).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // Nothing was deleted or moved
    let kind = HierarchyKind::Saved;
    assert!(db::get_folder(&pool, kind, &a.id).await.unwrap().is_some());
    let b = db::get_folder(&pool, kind, &b.id).await.unwrap().unwrap();
    assert_eq!(b.parent.as_deref(), Some(a.id.as_str()));
}

/// The migrate destination must lie outside the deleted folder's subtree:
/// moving contents into the folder itself or a descendant would orphan the
/// survivors or close a cycle.
#[tokio::test]
async fn test_migrate_delete_rejects_destination_in_subtree() {
    let (pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;

    let into_self = service.delete_folder(&a.id, Some(&a.id)).await;
    assert!(matches!(into_self, Err(Error::Validation(_))));

    let into_child = service.delete_folder(&a.id, Some(&b.id)).await;
    assert!(matches!(into_child, Err(Error::Conflict(_))));

    let into_grandchild = service.delete_folder(&a.id, Some(&c.id)).await;
    assert!(matches!(into_grandchild, Err(Error::Conflict(_))));

    // The tree is untouched
    let kind = HierarchyKind::Saved;
    assert!(db::get_folder(&pool, kind, &a.id).await.unwrap().is_some());
    let b = db::get_folder(&pool, kind, &b.id).await.unwrap().unwrap();
    assert_eq!(b.parent.as_deref(), Some(a.id.as_str()));
    let c = db::get_folder(&pool, kind, &c.id).await.unwrap().unwrap();
    assert_eq!(c.parent.as_deref(), Some(b.id.as_str()));
}

// ============================================================================
// Folder Detail and Path
// ============================================================================

#[tokio::test]
async fn test_folder_detail_is_single_level() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let _c = folder(&service, "c", Some(&b.id)).await;

    let direct = link(&service, "http://direct", Some(&b.id)).await;
    let _deeper = link(&service, "http://deeper", None).await;

    let detail = service.folder_detail(&b.id).await.unwrap();
    assert_eq!(detail.folder.id, b.id);
    assert_eq!(detail.parent.as_ref().map(|p| p.id.as_str()), Some(a.id.as_str()));
    assert_eq!(detail.subfolders.len(), 1);
    assert_eq!(detail.subfolders[0].name, "c");
    assert_eq!(detail.links.len(), 1);
    assert_eq!(detail.links[0].id, direct.id);
}

#[tokio::test]
async fn test_folder_detail_not_found() {
    let (_pool, service) = setup_service().await;

    let missing = Uuid::new_v4().to_string();
    let result = service.folder_detail(&missing).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

/// folder_path returns the ancestor chain root-first, ending at the folder.
#[tokio::test]
async fn test_folder_path_breadcrumb() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;
    let c = folder(&service, "c", Some(&b.id)).await;

    let path = service.folder_path(&c.id).await.unwrap();
    let names: Vec<&str> = path.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let root_path = service.folder_path(&a.id).await.unwrap();
    assert_eq!(root_path.len(), 1);
    assert_eq!(root_path[0].id, a.id);
}

// ============================================================================
// Link Operations
// ============================================================================

#[tokio::test]
async fn test_create_link_validation() {
    let (_pool, service) = setup_service().await;

    let empty = service
        .create_link(NewLink {
            url: "  ".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(empty, Err(Error::Validation(_))));

    let bad_folder = service
        .create_link(NewLink {
            url: "http://x".to_string(),
            folder: Some("not-a-valid-id".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(bad_folder, Err(Error::Validation(_))));

    // Syntactically valid but nonexistent folder: referential integrity
    // is enforced at write time.
    let dangling = service
        .create_link(NewLink {
            url: "http://x".to_string(),
            folder: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(dangling, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_link_lifecycle() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let l = link(&service, "http://x", Some(&a.id)).await;

    let listed = service.list_links(Some(&a.id)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, l.id);

    service.delete_link(&l.id).await.unwrap();
    assert!(service.list_links(Some(&a.id)).await.unwrap().is_empty());

    let again = service.delete_link(&l.id).await;
    assert!(matches!(again, Err(Error::NotFound(_))));
}

/// list_links is single-level: it never includes links from nested folders.
#[tokio::test]
async fn test_list_links_is_single_level() {
    let (_pool, service) = setup_service().await;

    let a = folder(&service, "a", None).await;
    let b = folder(&service, "b", Some(&a.id)).await;

    let in_a = link(&service, "http://a", Some(&a.id)).await;
    let _in_b = link(&service, "http://b", Some(&b.id)).await;

    let listed = service.list_links(Some(&a.id)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, in_a.id);
}

#[tokio::test]
async fn test_link_tags_round_trip() {
    let (_pool, service) = setup_service().await;

    let l = service
        .create_link(NewLink {
            url: "http://x".to_string(),
            description: Some("a picture".to_string()),
            tags: Some(vec!["sunset".to_string(), "beach".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(l.tag_list(), vec!["sunset", "beach"]);
    assert_eq!(l.description.as_deref(), Some("a picture"));
}

// ============================================================================
// Hierarchy Isolation
// ============================================================================

/// Records in the saved hierarchy are invisible to the image hierarchy
/// and vice versa.
#[tokio::test]
async fn test_hierarchies_are_isolated() {
    let pool = setup_test_db().await;
    let saved = HierarchyService::new(pool.clone(), HierarchyKind::Saved);
    let images = HierarchyService::new(pool.clone(), HierarchyKind::Image);

    let saved_folder = folder(&saved, "shared-name", None).await;
    link(&saved, "http://saved", Some(&saved_folder.id)).await;

    assert!(images.list_folders(None).await.unwrap().is_empty());
    assert!(images.list_contained_links(None).await.unwrap().is_empty());

    // The same name can exist at the root of both hierarchies
    let image_folder = images.create_folder("shared-name", None).await.unwrap();
    assert_ne!(image_folder.id, saved_folder.id);

    // A saved folder id does not resolve in the image hierarchy
    let dangling = images
        .create_link(NewLink {
            url: "http://img".to_string(),
            folder: Some(saved_folder.id.clone()),
            ..Default::default()
        })
        .await;
    assert!(matches!(dangling, Err(Error::NotFound(_))));
}
