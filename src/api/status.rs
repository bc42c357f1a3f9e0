//! Status Routes
//!
//! Health checks and system status.
//!
//! Routes:
//! - GET /health - Basic health check
//! - GET /status - Database connectivity and per-hierarchy counts

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db;
use crate::models::HierarchyKind;
use crate::{AppState, Result};

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(system_status))
}

#[derive(Debug, Serialize)]
struct HierarchyStatus {
    kind: &'static str,
    folders: i64,
    links: i64,
}

#[derive(Debug, Serialize)]
struct SystemStatus {
    status: &'static str,
    version: &'static str,
    database: DatabaseStatus,
    hierarchies: Vec<HierarchyStatus>,
}

#[derive(Debug, Serialize)]
struct DatabaseStatus {
    connected: bool,
}

/// Basic health check.
///
/// GET /health
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Detailed system status.
///
/// GET /status
async fn system_status(State(state): State<AppState>) -> Result<Json<SystemStatus>> {
    let connected = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let mut hierarchies = Vec::new();
    for kind in [HierarchyKind::Saved, HierarchyKind::Image] {
        hierarchies.push(HierarchyStatus {
            kind: kind.as_str(),
            folders: db::count_folders(&state.db, kind).await.unwrap_or(0),
            links: db::count_links(&state.db, kind).await.unwrap_or(0),
        });
    }

    Ok(Json(SystemStatus {
        status: if connected { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseStatus { connected },
        hierarchies,
    }))
}
