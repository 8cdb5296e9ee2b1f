//! Upload service
//!
//! Accepts a multipart payload, validates it (type and size only), writes it
//! under the uploads directory and returns the serving path. No conversion
//! is attempted; anything outside the allow-list is rejected with a
//! descriptive error.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};

/// Maximum accepted payload size (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fixed allow-list of audio MIME types
pub const AUDIO_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    "audio/webm",
];

/// What an uploaded file is allowed to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Audio,
    Image,
}

impl UploadKind {
    fn parse(value: &str) -> ApiResult<Self> {
        match value {
            "audio" => Ok(UploadKind::Audio),
            "image" => Ok(UploadKind::Image),
            other => Err(ApiError::BadRequest(format!("unknown upload kind: {other}"))),
        }
    }
}

/// An uploaded file pulled out of a multipart request
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validate an uploaded file against the size cap and the MIME rules for
/// its kind. Failures are `ValidationFailed`, surfacing as 400 at the API.
pub fn validate_upload(file: &UploadedFile, kind: UploadKind) -> keepsake_common::Result<()> {
    use keepsake_common::Error;

    if file.bytes.is_empty() {
        return Err(Error::ValidationFailed("uploaded file is empty".to_string()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(Error::ValidationFailed(format!(
            "file is too large: {} bytes exceeds the 10 MiB limit",
            file.bytes.len()
        )));
    }

    match kind {
        UploadKind::Audio => {
            if !AUDIO_MIME_TYPES.contains(&file.content_type.as_str()) {
                return Err(Error::ValidationFailed(format!(
                    "unsupported audio type {:?}; expected one of: {}",
                    file.content_type,
                    AUDIO_MIME_TYPES.join(", ")
                )));
            }
        }
        UploadKind::Image => {
            if !file.content_type.starts_with("image/") {
                return Err(Error::ValidationFailed(format!(
                    "unsupported image type {:?}",
                    file.content_type
                )));
            }
        }
    }

    Ok(())
}

/// Strip path separators and control characters from a client filename
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(['_', '.']).is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Write validated bytes under the uploads directory with a unique name and
/// return the serving path (`/uploads/<name>`).
pub async fn save_upload(uploads_dir: &Path, file: &UploadedFile) -> ApiResult<String> {
    let filename = format!("{}-{}", Uuid::new_v4(), sanitize_filename(&file.filename));
    let path = uploads_dir.join(&filename);

    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store upload: {e}")))?;

    info!("Stored upload: {} ({} bytes)", path.display(), file.bytes.len());
    Ok(format!("/uploads/{filename}"))
}

/// Read one field as an uploaded file
async fn read_file_field(field: axum::extract::multipart::Field<'_>) -> ApiResult<UploadedFile> {
    let filename = field.file_name().unwrap_or("file").to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed upload: {e}")))?
        .to_vec();

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

/// Pull the `file` field (and optional extra text fields) out of a
/// multipart request.
pub async fn read_multipart(
    mut multipart: Multipart,
    text_fields: &[&str],
) -> ApiResult<(Option<UploadedFile>, Vec<(String, String)>)> {
    let mut file = None;
    let mut texts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file = Some(read_file_field(field).await?);
        } else if text_fields.contains(&name.as_str()) {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("malformed field {name}: {e}")))?;
            texts.push((name, value));
        }
    }

    Ok((file, texts))
}

/// Upload endpoint response; mirrors the `{success, url}` / `{success,
/// error}` contract the page's upload flow expects.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/upload
///
/// Multipart fields: `file` (required), `kind` (`audio` | `image`,
/// default `audio`).
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Json<UploadResponse>) {
    match handle_upload(&state, multipart).await {
        Ok(url) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                url: Some(url),
                error: None,
            }),
        ),
        Err(err) => {
            let status = match &err {
                ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(UploadResponse {
                    success: false,
                    url: None,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

async fn handle_upload(state: &AppState, multipart: Multipart) -> ApiResult<String> {
    let (file, texts) = read_multipart(multipart, &["kind"]).await?;

    let file = file.ok_or_else(|| ApiError::BadRequest("no file uploaded".to_string()))?;
    let kind = texts
        .iter()
        .find(|(name, _)| name == "kind")
        .map(|(_, value)| UploadKind::parse(value))
        .transpose()?
        .unwrap_or(UploadKind::Audio);

    validate_upload(&file, kind)?;
    save_upload(&state.uploads_dir, &file).await
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload_file))
}
