//! Letters API
//!
//! Text notes stored in the local object store. List responses are served
//! from the in-memory projection; mutations go to the store first and are
//! reflected in the projection only after the store confirms them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use keepsake_common::store::{Note, Record};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateLetterRequest {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD`; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLetterRequest {
    pub title: String,
    pub content: String,
    pub date: String,
}

fn validate_text(field: &str, value: &str) -> keepsake_common::Result<()> {
    if value.trim().is_empty() {
        return Err(keepsake_common::Error::ValidationFailed(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// GET /api/letters
pub async fn list_letters(State(state): State<AppState>) -> Json<Vec<Note>> {
    let notes = state
        .letters
        .list()
        .await
        .into_iter()
        .filter_map(|r| match r {
            Record::Note(n) => Some(n),
            _ => None,
        })
        .collect();
    Json(notes)
}

/// POST /api/letters
pub async fn create_letter(
    State(state): State<AppState>,
    Json(payload): Json<CreateLetterRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    validate_text("title", &payload.title)?;
    validate_text("content", &payload.content)?;

    let note = Note {
        id: Uuid::new_v4().to_string(),
        title: payload.title.trim().to_string(),
        content: payload.content,
        date: payload
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string()),
    };

    let stored = state.store.add(Record::Note(note.clone())).await?;
    state.letters.insert(stored).await;
    info!("Letter created: {}", note.id);

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/letters/:id
///
/// Edit save: a full replace on the same id.
pub async fn update_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLetterRequest>,
) -> ApiResult<Json<Note>> {
    validate_text("title", &payload.title)?;
    validate_text("content", &payload.content)?;
    validate_text("date", &payload.date)?;

    let note = Note {
        id,
        title: payload.title.trim().to_string(),
        content: payload.content,
        date: payload.date,
    };

    let stored = state.store.replace(Record::Note(note.clone())).await?;
    state.letters.update(stored).await;

    Ok(Json(note))
}

/// DELETE /api/letters/:id
pub async fn delete_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete(&id).await?;
    state.letters.remove(&id).await;
    info!("Letter deleted: {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Build letters routes
pub fn letter_routes() -> Router<AppState> {
    Router::new()
        .route("/api/letters", get(list_letters).post(create_letter))
        .route("/api/letters/:id", put(update_letter).delete(delete_letter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_common::Error;

    #[test]
    fn blank_fields_fail_validation() {
        assert!(validate_text("title", "Hello").is_ok());

        let err = validate_text("title", "   ").unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }
}
