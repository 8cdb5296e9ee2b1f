//! Record variants persisted in the local object store
//!
//! Every user-authored entity is one of a closed set of tagged variants
//! sharing an opaque string `id`. The id is assigned by the writer at
//! creation time and never changes; the store enforces its uniqueness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text note ("letter")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Display date in `YYYY-MM-DD` form
    pub date: String,
}

/// A gallery photo referencing an uploaded image file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub caption: String,
    /// Serving path of the uploaded image, e.g. `/uploads/<name>`
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A playlist track referencing an uploaded audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    /// Serving path of the uploaded audio, e.g. `/uploads/<name>`
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

/// A single persisted record, tagged by feature area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Note(Note),
    Photo(Photo),
    Track(Track),
}

/// Record discriminant, used to filter projections by feature area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Note,
    Photo,
    Track,
}

impl Record {
    /// The store's primary key for this record
    pub fn id(&self) -> &str {
        match self {
            Record::Note(n) => &n.id,
            Record::Photo(p) => &p.id,
            Record::Track(t) => &t.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Note(_) => RecordKind::Note,
            Record::Photo(_) => RecordKind::Photo,
            Record::Track(_) => RecordKind::Track,
        }
    }
}

impl From<Note> for Record {
    fn from(note: Note) -> Self {
        Record::Note(note)
    }
}

impl From<Photo> for Record {
    fn from(photo: Photo) -> Self {
        Record::Photo(photo)
    }
}

impl From<Track> for Record {
    fn from(track: Track) -> Self {
        Record::Track(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_roundtrip_with_kind_tag() {
        let record = Record::Note(Note {
            id: "1".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            date: "2024-01-01".to_string(),
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""kind":"note""#));

        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.id(), "1");
        assert_eq!(parsed.kind(), RecordKind::Note);
    }
}
