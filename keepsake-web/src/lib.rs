//! keepsake-web library interface
//!
//! Exposes the application state and router for integration testing.

pub mod api;
pub mod cache;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use cache::RecordCache;
use chrono::{DateTime, Utc};
use keepsake_common::store::{RecordKind, StoreHandle};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Request body cap: the 10 MiB upload limit plus multipart framing overhead
const MAX_BODY_BYTES: usize = 11 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Song database connection pool
    pub db: SqlitePool,
    /// Local object store handle, opened once and reused for the session
    pub store: StoreHandle,
    /// Letters projection (newest first)
    pub letters: Arc<RecordCache>,
    /// Gallery projection (newest first)
    pub photos: Arc<RecordCache>,
    /// Directory uploaded files are written to
    pub uploads_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, store: StoreHandle, uploads_dir: PathBuf) -> Self {
        Self {
            db,
            store,
            letters: Arc::new(RecordCache::new(RecordKind::Note)),
            photos: Arc::new(RecordCache::new(RecordKind::Photo)),
            uploads_dir,
            startup_time: Utc::now(),
        }
    }

    /// Populate the in-memory projections from the object store
    pub async fn cold_start(&self) -> keepsake_common::Result<()> {
        self.letters.refresh(&self.store).await?;
        self.photos.refresh(&self.store).await?;
        Ok(())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML page and embedded assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::letter_routes())
        .merge(api::photo_routes())
        .merge(api::song_routes())
        .merge(api::upload_routes())
        .merge(api::game_routes())
        .merge(api::health_routes())
        // Uploaded files
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
