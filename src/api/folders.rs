//! Folder Routes
//!
//! Folder CRUD and containment queries for one hierarchy.
//!
//! Routes (nested under /saved/folders and /images/folders):
//! - GET /?parent=<id|null> - Direct children, or roots
//! - GET /links?parent=<id|null> - All links under a branch (containment)
//! - GET /:id - Folder detail (one level of contents)
//! - GET /:id/path - Breadcrumb path from the root
//! - POST / - Create a folder
//! - PUT /:id - Rename and/or move a folder
//! - DELETE /:id?moveContentsTo=<id> - Cascade or migrate delete

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::links::LinkResponse;
use super::normalize_id_param;
use crate::models::{Folder, HierarchyKind};
use crate::services::FolderWithParent;
use crate::{AppState, Result};

/// Build folder routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route("/links", get(list_contained_links))
        .route(
            "/:id",
            get(folder_detail).put(update_folder).delete(delete_folder),
        )
        .route("/:id/path", get(folder_path))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for folder listings.
#[derive(Debug, Deserialize, Default)]
pub struct ParentQuery {
    pub parent: Option<String>,
}

/// Query parameters for folder deletion.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderQuery {
    pub move_contents_to: Option<String>,
}

/// Request to create a folder.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent: Option<String>,
}

/// Request to rename and/or move a folder.
#[derive(Debug, Deserialize)]
pub struct UpdateFolderRequest {
    pub name: String,
    /// New parent id; omit (or null) to move to the root level.
    pub parent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListFoldersResponse {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Serialize)]
pub struct ContainedLinksResponse {
    pub links: Vec<LinkResponse>,
}

/// Folder detail: the folder with its parent resolved, plus one level of
/// contents.
#[derive(Debug, Serialize)]
pub struct FolderDetailResponse {
    pub folder: Folder,
    pub parent: Option<Folder>,
    pub subfolders: Vec<Folder>,
    pub links: Vec<LinkResponse>,
}

#[derive(Debug, Serialize)]
pub struct FolderPathResponse {
    pub path: Vec<Folder>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFolderResponse {
    pub deleted: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// List direct children of a parent folder, or root folders.
///
/// GET /folders?parent=<id|null>
async fn list_folders(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ListFoldersResponse>> {
    let parent = normalize_id_param(query.parent);
    let folders = state
        .hierarchy(kind)
        .list_folders(parent.as_deref())
        .await?;

    Ok(Json(ListFoldersResponse { folders }))
}

/// List every link under a branch of the tree, including nested folders.
///
/// GET /folders/links?parent=<id|null>
async fn list_contained_links(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ContainedLinksResponse>> {
    let parent = normalize_id_param(query.parent);
    let links = state
        .hierarchy(kind)
        .list_contained_links(parent.as_deref())
        .await?;

    Ok(Json(ContainedLinksResponse {
        links: links.into_iter().map(LinkResponse::from).collect(),
    }))
}

/// Get a folder with one level of contents.
///
/// GET /folders/:id
async fn folder_detail(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Path(id): Path<String>,
) -> Result<Json<FolderDetailResponse>> {
    let detail = state.hierarchy(kind).folder_detail(&id).await?;

    Ok(Json(FolderDetailResponse {
        folder: detail.folder,
        parent: detail.parent,
        subfolders: detail.subfolders,
        links: detail.links.into_iter().map(LinkResponse::from).collect(),
    }))
}

/// Get the breadcrumb path for a folder.
///
/// GET /folders/:id/path
async fn folder_path(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Path(id): Path<String>,
) -> Result<Json<FolderPathResponse>> {
    let path = state.hierarchy(kind).folder_path(&id).await?;
    Ok(Json(FolderPathResponse { path }))
}

/// Create a new folder.
///
/// POST /folders
#[axum::debug_handler]
async fn create_folder(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>)> {
    let folder = state
        .hierarchy(kind)
        .create_folder(&req.name, req.parent.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(folder)))
}

/// Rename and/or move a folder.
///
/// PUT /folders/:id
async fn update_folder(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<FolderWithParent>> {
    let updated = state
        .hierarchy(kind)
        .update_folder(&id, &req.name, req.parent.as_deref())
        .await?;

    Ok(Json(updated))
}

/// Delete a folder, cascading through its subtree or migrating its direct
/// contents to another folder.
///
/// DELETE /folders/:id?moveContentsTo=<id>
async fn delete_folder(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Path(id): Path<String>,
    Query(query): Query<DeleteFolderQuery>,
) -> Result<Json<DeleteFolderResponse>> {
    state
        .hierarchy(kind)
        .delete_folder(&id, query.move_contents_to.as_deref())
        .await?;

    Ok(Json(DeleteFolderResponse { deleted: true }))
}
