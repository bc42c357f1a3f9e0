//! Link queries.
//!
//! Same executor-generic shape as the folder queries: folder deletion
//! reparents or removes links inside the surrounding transaction.

use sqlx::{Executor, Sqlite};

use crate::models::{CreateLink, HierarchyKind, Link};
use crate::{Error, Result};

/// Insert a new link.
pub async fn insert_link<'e, E>(executor: E, kind: HierarchyKind, input: CreateLink) -> Result<Link>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO {} (id, url, folder, description, tags, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        kind.link_table()
    );
    sqlx::query_as::<_, Link>(&sql)
        .bind(&input.id)
        .bind(&input.url)
        .bind(&input.folder)
        .bind(&input.description)
        .bind(&input.tags)
        .bind(&input.created_at)
        .fetch_one(executor)
        .await
        .map_err(Error::Database)
}

/// Get a link by id.
pub async fn get_link<'e, E>(executor: E, kind: HierarchyKind, id: &str) -> Result<Option<Link>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT * FROM {} WHERE id = ?", kind.link_table());
    sqlx::query_as::<_, Link>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)
}

/// List links directly owned by a folder, newest first.
/// A None folder lists root-level links.
pub async fn list_links_by_folder<'e, E>(
    executor: E,
    kind: HierarchyKind,
    folder: Option<&str>,
) -> Result<Vec<Link>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT * FROM {} WHERE folder IS ? ORDER BY created_at DESC",
        kind.link_table()
    );
    sqlx::query_as::<_, Link>(&sql)
        .bind(folder)
        .fetch_all(executor)
        .await
        .map_err(Error::Database)
}

/// List links owned by any folder in the given set, newest first.
pub async fn list_links_in_folders<'e, E>(
    executor: E,
    kind: HierarchyKind,
    folder_ids: &[String],
) -> Result<Vec<Link>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if folder_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; folder_ids.len()].join(", ");
    let sql = format!(
        "SELECT * FROM {} WHERE folder IN ({}) ORDER BY created_at DESC",
        kind.link_table(),
        placeholders
    );

    let mut query = sqlx::query_as::<_, Link>(&sql);
    for id in folder_ids {
        query = query.bind(id);
    }
    query.fetch_all(executor).await.map_err(Error::Database)
}

/// Reparent every link directly owned by `from` to `to`. Returns the
/// number of links moved.
pub async fn reparent_links<'e, E>(
    executor: E,
    kind: HierarchyKind,
    from: &str,
    to: &str,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("UPDATE {} SET folder = ? WHERE folder = ?", kind.link_table());
    let result = sqlx::query(&sql)
        .bind(to)
        .bind(from)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Delete a link row. Returns true if a row was removed.
pub async fn delete_link_row<'e, E>(executor: E, kind: HierarchyKind, id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.link_table());
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every link owned by any folder in the given set. Returns the
/// number of links removed.
pub async fn delete_links_in_folders<'e, E>(
    executor: E,
    kind: HierarchyKind,
    folder_ids: &[String],
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if folder_ids.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; folder_ids.len()].join(", ");
    let sql = format!(
        "DELETE FROM {} WHERE folder IN ({})",
        kind.link_table(),
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in folder_ids {
        query = query.bind(id);
    }
    let result = query.execute(executor).await?;
    Ok(result.rows_affected())
}

/// Count links in a hierarchy.
pub async fn count_links<'e, E>(executor: E, kind: HierarchyKind) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM {}", kind.link_table());
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(executor).await?;
    Ok(count)
}
