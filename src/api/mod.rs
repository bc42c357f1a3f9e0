//! API Routes for Linkstash
//!
//! Two parallel route trees — /saved and /images — share one handler set;
//! an extension layer tells the handlers which hierarchy they serve.

mod folders;
mod links;
pub mod status;

use axum::{Extension, Router};

use crate::models::HierarchyKind;
use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /health, /status - Health checks (public)
/// - /saved/folders/*, /saved/links/* - Saved-link hierarchy
/// - /images/folders/*, /images/links/* - Image-link hierarchy
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/saved", hierarchy_routes(HierarchyKind::Saved))
        .nest("/images", hierarchy_routes(HierarchyKind::Image))
}

/// Folder and link routes for one hierarchy kind.
fn hierarchy_routes(kind: HierarchyKind) -> Router<AppState> {
    Router::new()
        .nest("/folders", folders::routes())
        .nest("/links", links::routes())
        .layer(Extension(kind))
}

/// Normalize an optional id query parameter.
///
/// The frontend sends `parent=null` for the root level; treat that (and
/// the empty string) the same as an absent parameter.
pub(crate) fn normalize_id_param(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.is_empty() && v != "null")
}
