//! Link Routes
//!
//! Flat link operations for one hierarchy. Listing here is single-level
//! (direct folder membership only); the containment query lives under
//! the folder routes.
//!
//! Routes (nested under /saved/links and /images/links):
//! - GET /?folder=<id|null> - Links directly in a folder, or root links
//! - POST / - Create a link
//! - DELETE /:id - Delete a link

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::normalize_id_param;
use crate::models::{HierarchyKind, Link};
use crate::services::NewLink;
use crate::{AppState, Result};

/// Build link routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(create_link))
        .route("/:id", axum::routing::delete(delete_link))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for link listings.
#[derive(Debug, Deserialize, Default)]
pub struct FolderQuery {
    pub folder: Option<String>,
}

/// Request to create a link.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
    pub folder: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Link response with the tag set decoded.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub url: String,
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        let tags = link.tag_list();
        Self {
            id: link.id,
            url: link.url,
            folder: link.folder,
            description: link.description,
            tags,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub deleted: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// List links directly owned by a folder, or root-level links.
///
/// GET /links?folder=<id|null>
async fn list_links(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Query(query): Query<FolderQuery>,
) -> Result<Json<ListLinksResponse>> {
    let folder = normalize_id_param(query.folder);
    let links = state.hierarchy(kind).list_links(folder.as_deref()).await?;

    Ok(Json(ListLinksResponse {
        links: links.into_iter().map(LinkResponse::from).collect(),
    }))
}

/// Create a new link.
///
/// POST /links
#[axum::debug_handler]
async fn create_link(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let link = state
        .hierarchy(kind)
        .create_link(NewLink {
            url: req.url,
            folder: req.folder,
            description: req.description,
            tags: req.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(LinkResponse::from(link))))
}

/// Delete a link.
///
/// DELETE /links/:id
async fn delete_link(
    State(state): State<AppState>,
    Extension(kind): Extension<HierarchyKind>,
    Path(id): Path<String>,
) -> Result<Json<DeleteLinkResponse>> {
    state.hierarchy(kind).delete_link(&id).await?;
    Ok(Json(DeleteLinkResponse { deleted: true }))
}
