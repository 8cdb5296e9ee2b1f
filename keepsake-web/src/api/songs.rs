//! Playlist API
//!
//! Songs are server-side entities in the sqlite database, ordered by their
//! server-assigned creation timestamp (most recent first).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use keepsake_common::db::{self, Song};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    pub name: String,
    pub artist: Option<String>,
    /// Serving path returned by the upload endpoint
    pub audio_file: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub audio_file: Option<String>,
}

fn parse_guid(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("invalid song id: {id}")))
}

/// GET /api/songs
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    let songs = db::list_songs(&state.db).await?;
    Ok(Json(songs))
}

/// POST /api/songs
pub async fn create_song(
    State(state): State<AppState>,
    Json(payload): Json<CreateSongRequest>,
) -> ApiResult<(StatusCode, Json<Song>)> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if payload.audio_file.trim().is_empty() {
        return Err(ApiError::BadRequest("audio_file must not be empty".to_string()));
    }

    let song = Song::new(
        payload.name.trim().to_string(),
        payload.artist,
        payload.audio_file,
    );
    let created = db::create_song(&state.db, &song).await?;
    info!("Song created: {} ({})", created.name, created.guid);

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/songs/:id
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSongRequest>,
) -> ApiResult<Json<Song>> {
    let guid = parse_guid(&id)?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
    }

    let updated = db::update_song(
        &state.db,
        guid,
        payload.name,
        payload.artist,
        payload.audio_file,
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let guid = parse_guid(&id)?;
    db::delete_song(&state.db, guid).await?;
    info!("Song deleted: {}", guid);

    Ok(StatusCode::NO_CONTENT)
}

/// Build playlist routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs", get(list_songs).post(create_song))
        .route("/api/songs/:id", patch(update_song).delete(delete_song))
}
