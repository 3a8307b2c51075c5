//! ShareIt Peer-to-Peer Item Sharing Server
//!
//! A Rust implementation of the ShareIt backend: users list items, other
//! users book them, owners approve or reject, and borrowers post requests
//! for items missing from the catalog. Exposes a REST JSON API identified
//! by a caller-supplied `X-Sharer-User-Id` header.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
