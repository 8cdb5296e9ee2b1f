//! Gallery API
//!
//! Photos live in the local object store; the image bytes themselves go to
//! the uploads directory and the record carries the serving path. Mutations
//! follow the same confirm-then-reflect order as letters.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use keepsake_common::store::{Photo, Record};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::upload::{read_multipart, save_upload, validate_upload, UploadKind};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/photos
pub async fn list_photos(State(state): State<AppState>) -> Json<Vec<Photo>> {
    let photos = state
        .photos
        .list()
        .await
        .into_iter()
        .filter_map(|r| match r {
            Record::Photo(p) => Some(p),
            _ => None,
        })
        .collect();
    Json(photos)
}

/// POST /api/photos
///
/// Multipart fields: `file` (an image, required), `caption` (required).
pub async fn create_photo(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Photo>)> {
    let (file, texts) = read_multipart(multipart, &["caption"]).await?;

    let file = file.ok_or_else(|| ApiError::BadRequest("missing file".to_string()))?;
    let caption = texts
        .into_iter()
        .find(|(name, _)| name == "caption")
        .map(|(_, value)| value)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing caption".to_string()))?;

    validate_upload(&file, UploadKind::Image)?;
    let image_url = save_upload(&state.uploads_dir, &file).await?;

    let photo = Photo {
        id: Uuid::new_v4().to_string(),
        caption,
        image_url,
        created_at: chrono::Utc::now(),
    };

    let stored = state.store.add(Record::Photo(photo.clone())).await?;
    state.photos.insert(stored).await;
    info!("Photo added: {}", photo.id);

    Ok((StatusCode::CREATED, Json(photo)))
}

/// DELETE /api/photos/:id
///
/// Removes the record; the upload file is cleaned up best-effort after the
/// store confirms the delete. The file's path comes from the store itself,
/// not the projection, which may lag behind it.
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let image_url = state.store.get_all().await?.into_iter().find_map(|r| match r {
        Record::Photo(p) if p.id == id => Some(p.image_url),
        _ => None,
    });

    state.store.delete(&id).await?;
    state.photos.remove(&id).await;
    info!("Photo deleted: {}", id);

    if let Some(url) = image_url {
        if let Some(filename) = url.strip_prefix("/uploads/") {
            let path = state.uploads_dir.join(filename);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Could not remove upload {}: {}", path.display(), e);
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build gallery routes
pub fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/api/photos", get(list_photos).post(create_photo))
        .route("/api/photos/:id", delete(delete_photo))
}
