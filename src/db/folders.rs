//! Folder queries.
//!
//! All functions are generic over the executor so they run against the
//! pool directly or inside a transaction (folder deletion spans many
//! statements and must commit atomically). The table is selected by the
//! hierarchy kind; table names are static strings, never caller input.

use sqlx::{Executor, Sqlite};

use crate::models::{CreateFolder, Folder, HierarchyKind};
use crate::{Error, Result};

/// Insert a new folder.
pub async fn insert_folder<'e, E>(
    executor: E,
    kind: HierarchyKind,
    input: CreateFolder,
) -> Result<Folder>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO {} (id, name, parent, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        kind.folder_table()
    );
    sqlx::query_as::<_, Folder>(&sql)
        .bind(&input.id)
        .bind(&input.name)
        .bind(&input.parent)
        .bind(&input.created_at)
        .fetch_one(executor)
        .await
        .map_err(Error::Database)
}

/// Get a folder by id.
pub async fn get_folder<'e, E>(
    executor: E,
    kind: HierarchyKind,
    id: &str,
) -> Result<Option<Folder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT * FROM {} WHERE id = ?", kind.folder_table());
    sqlx::query_as::<_, Folder>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)
}

/// List direct children of a parent folder, newest first.
/// A None parent lists root-level folders.
pub async fn list_child_folders<'e, E>(
    executor: E,
    kind: HierarchyKind,
    parent: Option<&str>,
) -> Result<Vec<Folder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    // `IS ?` matches NULL when the bound parent is None
    let sql = format!(
        "SELECT * FROM {} WHERE parent IS ? ORDER BY created_at DESC",
        kind.folder_table()
    );
    sqlx::query_as::<_, Folder>(&sql)
        .bind(parent)
        .fetch_all(executor)
        .await
        .map_err(Error::Database)
}

/// Find a folder by name under a given parent (sibling lookup).
pub async fn find_folder_by_name<'e, E>(
    executor: E,
    kind: HierarchyKind,
    name: &str,
    parent: Option<&str>,
) -> Result<Option<Folder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT * FROM {} WHERE name = ? AND parent IS ?",
        kind.folder_table()
    );
    sqlx::query_as::<_, Folder>(&sql)
        .bind(name)
        .bind(parent)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)
}

/// Update a folder's name and parent. Returns None if the id is unknown.
pub async fn update_folder<'e, E>(
    executor: E,
    kind: HierarchyKind,
    id: &str,
    name: &str,
    parent: Option<&str>,
) -> Result<Option<Folder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE {} SET name = ?, parent = ? WHERE id = ? RETURNING *",
        kind.folder_table()
    );
    sqlx::query_as::<_, Folder>(&sql)
        .bind(name)
        .bind(parent)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)
}

/// Reparent every direct child of `from` to `to`. Returns the number of
/// folders moved.
pub async fn reparent_child_folders<'e, E>(
    executor: E,
    kind: HierarchyKind,
    from: &str,
    to: &str,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE {} SET parent = ? WHERE parent = ?",
        kind.folder_table()
    );
    let result = sqlx::query(&sql)
        .bind(to)
        .bind(from)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Delete a folder row. Returns true if a row was removed.
pub async fn delete_folder_row<'e, E>(executor: E, kind: HierarchyKind, id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.folder_table());
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Count folders in a hierarchy.
pub async fn count_folders<'e, E>(executor: E, kind: HierarchyKind) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM {}", kind.folder_table());
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(executor).await?;
    Ok(count)
}
