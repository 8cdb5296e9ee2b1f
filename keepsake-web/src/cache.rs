//! In-memory record cache
//!
//! An ordered, most-recent-first projection of one record kind, mirroring
//! the local object store's contents for the list endpoints. The cache is
//! never authoritative: it is rebuilt from the store on cold start and
//! updated only after a store mutation has been confirmed, so the rendered
//! list never shows a record the store has not durably accepted (or still
//! holds).

use keepsake_common::store::{Record, RecordKind, StoreHandle};
use keepsake_common::Result;
use tokio::sync::RwLock;

pub struct RecordCache {
    kind: RecordKind,
    entries: RwLock<Vec<Record>>,
}

impl RecordCache {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Cold start: rebuild the projection from the store. The store returns
    /// insertion order; the cache shows newest first.
    pub async fn refresh(&self, store: &StoreHandle) -> Result<()> {
        let mut records: Vec<Record> = store
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.kind() == self.kind)
            .collect();
        records.reverse();

        *self.entries.write().await = records;
        Ok(())
    }

    /// Current projection, newest first
    pub async fn list(&self) -> Vec<Record> {
        self.entries.read().await.clone()
    }

    /// Prepend a record. Call only after the store confirmed the add.
    pub async fn insert(&self, record: Record) {
        debug_assert_eq!(record.kind(), self.kind);
        self.entries.write().await.insert(0, record);
    }

    /// Replace a record in place. Call only after the store confirmed the
    /// replace.
    pub async fn update(&self, record: Record) {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.iter_mut().find(|r| r.id() == record.id()) {
            *existing = record;
        }
    }

    /// Filter out a record. Call only after the store confirmed the delete.
    pub async fn remove(&self, id: &str) {
        self.entries.write().await.retain(|r| r.id() != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_common::store::{Note, Store};

    fn note(id: &str, title: &str) -> Record {
        Record::Note(Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            date: "2024-01-01".to_string(),
        })
    }

    #[tokio::test]
    async fn refresh_shows_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();
        store.add(note("a", "Older")).await.unwrap();
        store.add(note("b", "Newer")).await.unwrap();

        let cache = RecordCache::new(RecordKind::Note);
        cache.refresh(&store).await.unwrap();

        let listed = cache.list().await;
        assert_eq!(listed[0].id(), "b");
        assert_eq!(listed[1].id(), "a");
    }

    #[tokio::test]
    async fn failed_store_mutation_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();
        let cache = RecordCache::new(RecordKind::Note);

        let record = note("a", "First");
        store.add(record.clone()).await.unwrap();
        cache.insert(record).await;

        // Duplicate add is rejected by the store; the cache is only updated
        // after confirmation, so it must still show exactly one record.
        assert!(store.add(note("a", "Imposter")).await.is_err());
        let listed = cache.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], note("a", "First"));

        // A reload reproduces the same projection from durable state.
        let rebuilt = RecordCache::new(RecordKind::Note);
        rebuilt.refresh(&store).await.unwrap();
        assert_eq!(rebuilt.list().await, listed);
    }

    #[tokio::test]
    async fn cache_filters_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("records.json")).await.unwrap();
        store.add(note("n", "Letter")).await.unwrap();
        store
            .add(Record::Photo(keepsake_common::store::Photo {
                id: "p".to_string(),
                caption: "Us".to_string(),
                image_url: "/uploads/p.jpg".to_string(),
                created_at: chrono::Utc::now(),
            }))
            .await
            .unwrap();

        let cache = RecordCache::new(RecordKind::Photo);
        cache.refresh(&store).await.unwrap();
        let listed = cache.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), "p");
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let cache = RecordCache::new(RecordKind::Note);
        cache.insert(note("a", "Old")).await;
        cache.insert(note("b", "Other")).await;

        cache.update(note("a", "New")).await;
        let listed = cache.list().await;
        assert_eq!(listed[1], note("a", "New"));

        cache.remove("b").await;
        assert_eq!(cache.list().await.len(), 1);
    }
}
