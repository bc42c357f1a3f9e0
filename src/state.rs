//! Application state for Linkstash.
//!
//! Contains the shared state that is passed to all handlers: the database
//! pool and one hierarchy service per hierarchy kind.

use crate::db::DbPool;
use crate::models::HierarchyKind;
use crate::services::HierarchyService;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Hierarchy service bound to the saved-link tree.
    pub saved: HierarchyService,
    /// Hierarchy service bound to the image-link tree.
    pub images: HierarchyService,
}

impl AppState {
    /// Create a new application state, initializing the database from
    /// configuration.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::from_pool(db))
    }

    /// Build state around an existing pool. Used by tests.
    pub fn from_pool(db: DbPool) -> Self {
        let saved = HierarchyService::new(db.clone(), HierarchyKind::Saved);
        let images = HierarchyService::new(db.clone(), HierarchyKind::Image);

        Self { db, saved, images }
    }

    /// Resolve the hierarchy service for a kind.
    pub fn hierarchy(&self, kind: HierarchyKind) -> &HierarchyService {
        match kind {
            HierarchyKind::Saved => &self.saved,
            HierarchyKind::Image => &self.images,
        }
    }
}
