//! uasa-api library - class roster HTTP service
//!
//! Exposes the roster operations over a [`ClassStore`] handle supplied at
//! startup. Handlers share no state beyond the store itself.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uasa_common::config::Config;
use uasa_common::ClassStore;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store handle
    pub store: Arc<dyn ClassStore>,
    /// Directory holding temporary uploaded rosters
    pub upload_dir: PathBuf,
    /// Subject codes pre-populated on imported students
    pub subjects: Arc<[String]>,
    /// Directory served for non-API paths
    pub static_dir: PathBuf,
    /// Maximum request body size in bytes
    pub body_limit_bytes: usize,
}

impl AppState {
    /// Create application state from a store handle and resolved configuration
    pub fn new(store: Arc<dyn ClassStore>, config: &Config) -> Self {
        Self {
            store,
            upload_dir: config.upload_dir.clone(),
            subjects: config.subjects.clone().into(),
            static_dir: config.static_dir.clone(),
            body_limit_bytes: config.body_limit_bytes,
        }
    }
}

/// Build application router
///
/// Unmatched paths fall through to the static directory.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let body_limit = state.body_limit_bytes;

    Router::new()
        .merge(api::kelas_routes())
        .merge(api::upload_routes())
        .merge(api::health_routes())
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
