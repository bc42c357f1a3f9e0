//! Linkstash - Nested-Folder Bookmark Manager
//!
//! A REST service for organizing saved links and image links into
//! hierarchically nested folders, backed by SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
