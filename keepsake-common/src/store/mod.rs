//! Local object store for user-authored records
//!
//! A single flat keyed container persisted as one JSON file under the root
//! folder. Records have no cross-record relationships, so there is no
//! relational schema; the container is created idempotently on first open
//! and the handle is reused for the life of the process.
//!
//! Every mutation is all-or-nothing: the new contents are written to a
//! temporary file and renamed over the container before in-memory state is
//! updated, so a failed operation leaves both durable and in-memory state
//! unchanged. The store performs no retries; failures surface to the caller
//! immediately.

pub mod record;

pub use record::{Note, Photo, Record, RecordKind, Track};

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};
use tokio::sync::Mutex;
use tracing::info;

/// On-disk container layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Container {
    version: u32,
    records: Vec<Record>,
}

const CONTAINER_VERSION: u32 = 1;

/// Open containers, keyed by canonical path. Separately opened handles to
/// the same container share one image, so a mutation through one handle can
/// never overwrite a write already committed through another.
static OPEN_CONTAINERS: Lazy<StdMutex<HashMap<PathBuf, Weak<StoreInner>>>> =
    Lazy::new(|| StdMutex::new(HashMap::new()));

/// The local object store. Construct a handle with [`Store::open`].
pub struct Store;

impl Store {
    /// Open the container at `path`, creating it with an empty schema on
    /// first-ever use.
    ///
    /// Safe under concurrent first-open: creation uses `create_new`, so at
    /// most one caller performs the schema-creation step; the others observe
    /// the existing container. All handles to the same container within one
    /// process share a single image, so writes through any of them are seen
    /// by all.
    pub async fn open(path: impl Into<PathBuf>) -> Result<StoreHandle> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::StoreUnavailable(format!("cannot create store directory: {e}")))?;
        }

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                let empty = serde_json::to_vec_pretty(&Container {
                    version: CONTAINER_VERSION,
                    records: Vec::new(),
                })
                .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
                file.write_all(&empty)
                    .map_err(|e| Error::StoreUnavailable(format!("cannot initialize container: {e}")))?;
                info!("Created record container: {}", path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(Error::StoreUnavailable(format!(
                    "cannot create container {}: {e}",
                    path.display()
                )));
            }
        }

        let canonical = std::fs::canonicalize(&path)
            .map_err(|e| Error::StoreUnavailable(format!("cannot resolve container path: {e}")))?;

        let mut registry = OPEN_CONTAINERS
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(inner) = registry.get(&canonical).and_then(Weak::upgrade) {
            return Ok(StoreHandle { inner });
        }

        let text = std::fs::read_to_string(&canonical)
            .map_err(|e| Error::StoreUnavailable(format!("cannot read container: {e}")))?;

        // A concurrent first-open may observe the container between creation
        // and the initial write; an empty file is an empty schema.
        let container: Container = if text.trim().is_empty() {
            Container::default()
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::StoreUnavailable(format!("corrupt container: {e}")))?
        };

        let inner = Arc::new(StoreInner {
            path: canonical.clone(),
            records: Mutex::new(container.records),
        });
        registry.insert(canonical, Arc::downgrade(&inner));

        Ok(StoreHandle { inner })
    }
}

struct StoreInner {
    path: PathBuf,
    /// In-memory image of the container, insertion order. The mutex
    /// serializes all operations issued against this handle.
    records: Mutex<Vec<Record>>,
}

/// Open reference to the persistence container, reused across operations.
/// Cheap to clone; all clones share one serialized container image.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<StoreInner>,
}

impl StoreHandle {
    /// Every stored record, in insertion order. Stable across repeated calls
    /// absent mutation.
    pub async fn get_all(&self) -> Result<Vec<Record>> {
        Ok(self.inner.records.lock().await.clone())
    }

    /// Insert a new record, durably persisting it before returning.
    ///
    /// Fails with `DuplicateKey` if the record's id already exists; the
    /// store never silently overwrites.
    pub async fn add(&self, record: Record) -> Result<Record> {
        let mut records = self.inner.records.lock().await;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(Error::DuplicateKey(record.id().to_string()));
        }

        let mut next = records.clone();
        next.push(record.clone());
        persist(&self.inner.path, &next)?;

        *records = next;
        Ok(record)
    }

    /// Full replace-on-same-id ("edit save"). Fails with `NotFound` if no
    /// record has the given id. The record keeps its position.
    pub async fn replace(&self, record: Record) -> Result<Record> {
        let mut records = self.inner.records.lock().await;

        let idx = records
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| Error::NotFound(record.id().to_string()))?;

        let mut next = records.clone();
        next[idx] = record.clone();
        persist(&self.inner.path, &next)?;

        *records = next;
        Ok(record)
    }

    /// Remove the record with the given id.
    ///
    /// Fails with `NotFound` if no such record exists; callers wanting
    /// idempotent deletes must tolerate that outcome themselves.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.inner.records.lock().await;

        let idx = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut next = records.clone();
        next.remove(idx);
        persist(&self.inner.path, &next)?;

        *records = next;
        Ok(())
    }
}

/// Write the container contents via a temporary file and atomic rename.
fn persist(path: &Path, records: &[Record]) -> Result<()> {
    let container = Container {
        version: CONTAINER_VERSION,
        records: records.to_vec(),
    };
    let json = serde_json::to_string_pretty(&container)
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .map_err(|e| Error::StoreUnavailable(format!("cannot write container: {e}")))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| Error::StoreUnavailable(format!("cannot commit container: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str) -> Record {
        Record::Note(Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            date: "2024-01-01".to_string(),
        })
    }

    #[tokio::test]
    async fn add_then_get_all_contains_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        let record = note("a", "First");
        store.add(record.clone()).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![record]);
    }

    #[tokio::test]
    async fn duplicate_add_fails_and_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        store.add(note("a", "First")).await.unwrap();
        let before = store.get_all().await.unwrap();

        let err = store.add(note("a", "Second")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref id) if id == "a"));

        assert_eq!(store.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_missing_fails_and_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        store.add(note("a", "First")).await.unwrap();
        let before = store.get_all().await.unwrap();

        let err = store.delete("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id == "missing"));

        assert_eq!(store.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn add_delete_roundtrip_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        store.add(note("gone", "Ephemeral")).await.unwrap();
        store.delete("gone").await.unwrap();

        let all = store.get_all().await.unwrap();
        assert!(all.iter().all(|r| r.id() != "gone"));
    }

    #[tokio::test]
    async fn note_lifecycle_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        let record = Record::Note(Note {
            id: "1".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            date: "2024-01-01".to_string(),
        });
        store.add(record.clone()).await.unwrap();
        assert_eq!(store.get_all().await.unwrap(), vec![record]);

        store.delete("1").await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());

        let err = store.delete("1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn replace_keeps_position_and_requires_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        store.add(note("a", "First")).await.unwrap();
        store.add(note("b", "Second")).await.unwrap();

        store.replace(note("a", "Edited")).await.unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all[0], note("a", "Edited"));
        assert_eq!(all[1], note("b", "Second"));

        let err = store.replace(note("c", "Nope")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn records_survive_reopen_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        {
            let store = Store::open(&path).await.unwrap();
            store.add(note("a", "First")).await.unwrap();
            store.add(note("b", "Second")).await.unwrap();
        }

        let store = Store::open(&path).await.unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), "a");
        assert_eq!(all[1].id(), "b");
    }

    #[tokio::test]
    async fn concurrent_open_never_loses_a_subsequent_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let (first, second) = tokio::join!(Store::open(&path), Store::open(&path));
        let first = first.unwrap();
        second.unwrap();

        first.add(note("a", "First")).await.unwrap();

        // A fresh open sees the write regardless of which opener created
        // the container.
        let reread = Store::open(&path).await.unwrap();
        assert_eq!(reread.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn writes_through_either_handle_of_a_concurrent_open_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let (first, second) = tokio::join!(Store::open(&path), Store::open(&path));
        let first = first.unwrap();
        let second = second.unwrap();

        first.add(note("a", "Via first")).await.unwrap();
        second.add(note("b", "Via second")).await.unwrap();

        // Both handles and a fresh open observe both writes.
        let ids: Vec<String> = first
            .get_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "b"]);

        let reread = Store::open(&path).await.unwrap();
        assert_eq!(reread.get_all().await.unwrap().len(), 2);

        // Id uniqueness holds across handles as well
        let err = second.add(note("a", "Clash")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn concurrent_same_id_adds_exactly_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        let s1 = store.clone();
        let s2 = store.clone();
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.add(note("a", "One")).await }),
            tokio::spawn(async move { s2.add(note("a", "Two")).await }),
        );
        let r1 = r1.unwrap();
        let r2 = r2.unwrap();

        assert!(r1.is_ok() ^ r2.is_ok());
        let loser = if r1.is_err() { r1 } else { r2 };
        assert!(matches!(loser.unwrap_err(), Error::DuplicateKey(_)));
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mixed_kinds_share_one_container() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();

        store.add(note("n1", "A letter")).await.unwrap();
        store
            .add(Record::Photo(Photo {
                id: "p1".to_string(),
                caption: "Us".to_string(),
                image_url: "/uploads/p1.jpg".to_string(),
                created_at: chrono::Utc::now(),
            }))
            .await
            .unwrap();
        store
            .add(Record::Track(Track {
                id: "t1".to_string(),
                name: "Our song".to_string(),
                artist: "Unknown Artist".to_string(),
                audio_url: "/uploads/t1.mp3".to_string(),
                created_at: chrono::Utc::now(),
            }))
            .await
            .unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind(), RecordKind::Note);
        assert_eq!(all[1].kind(), RecordKind::Photo);
        assert_eq!(all[2].kind(), RecordKind::Track);

        // An id is unique across kinds, not per kind
        let err = store
            .add(Record::Photo(Photo {
                id: "n1".to_string(),
                caption: "Clash".to_string(),
                image_url: "/uploads/x.jpg".to_string(),
                created_at: chrono::Utc::now(),
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
    }
}
