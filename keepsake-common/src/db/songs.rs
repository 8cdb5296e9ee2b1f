//! Song database operations
//!
//! The songs table is the server-side entity store behind the playlist.
//! Query failures surface as `RemoteUnavailable`; a missing row on delete
//! or update is `NotFound`.

use crate::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Playlist entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub guid: Uuid,
    pub name: String,
    pub artist: String,
    /// Serving path of the uploaded audio file
    pub audio_file: String,
    pub created_at: String,
}

impl Song {
    /// Create a new song; a missing artist defaults to "Unknown Artist"
    pub fn new(name: String, artist: Option<String>, audio_file: String) -> Self {
        let artist = match artist {
            Some(a) if !a.trim().is_empty() => a,
            _ => "Unknown Artist".to_string(),
        };
        Self {
            guid: Uuid::new_v4(),
            name,
            artist,
            audio_file,
            created_at: String::new(),
        }
    }
}

fn song_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Song> {
    let guid_str: String = row.get("guid");
    Ok(Song {
        guid: Uuid::parse_str(&guid_str)
            .map_err(|e| Error::RemoteUnavailable(format!("corrupt song guid: {e}")))?,
        name: row.get("name"),
        artist: row.get("artist"),
        audio_file: row.get("audio_file"),
        created_at: row.get("created_at"),
    })
}

/// List all songs, most recently created first
pub async fn list_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, name, artist, audio_file, created_at
        FROM songs
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

    rows.iter().map(song_from_row).collect()
}

/// Insert a new song and return it with its server-assigned creation time
pub async fn create_song(pool: &SqlitePool, song: &Song) -> Result<Song> {
    sqlx::query(
        r#"
        INSERT INTO songs (guid, name, artist, audio_file, created_at, updated_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(song.guid.to_string())
    .bind(&song.name)
    .bind(&song.artist)
    .bind(&song.audio_file)
    .execute(pool)
    .await
    .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

    load_song(pool, song.guid)
        .await?
        .ok_or_else(|| Error::RemoteUnavailable("song vanished after insert".to_string()))
}

/// Load a song by guid
pub async fn load_song(pool: &SqlitePool, guid: Uuid) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT guid, name, artist, audio_file, created_at
        FROM songs
        WHERE guid = ?
        "#,
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

    row.as_ref().map(song_from_row).transpose()
}

/// Partially update a song; `None` fields keep their current value
pub async fn update_song(
    pool: &SqlitePool,
    guid: Uuid,
    name: Option<String>,
    artist: Option<String>,
    audio_file: Option<String>,
) -> Result<Song> {
    let result = sqlx::query(
        r#"
        UPDATE songs SET
            name = COALESCE(?, name),
            artist = COALESCE(?, artist),
            audio_file = COALESCE(?, audio_file),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(name)
    .bind(artist)
    .bind(audio_file)
    .bind(guid.to_string())
    .execute(pool)
    .await
    .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(guid.to_string()));
    }

    load_song(pool, guid)
        .await?
        .ok_or_else(|| Error::NotFound(guid.to_string()))
}

/// Delete a song by guid; `NotFound` if no such song exists
pub async fn delete_song(pool: &SqlitePool, guid: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await
        .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(guid.to_string()));
    }

    Ok(())
}
