//! `IRecordStore` over a mutex-guarded map, for tests that need a store but
//! not SQLite.

use std::collections::BTreeMap;
use std::sync::Mutex;

use envcat_core::errors::{EnvcatResult, StorageError};
use envcat_core::models::{EmbeddingRecord, RecordPredicate, UnifiedRecord};
use envcat_core::traits::IRecordStore;

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<String, UnifiedRecord>>,
    embeddings: Mutex<Vec<EmbeddingRecord>>,
}

fn poisoned() -> StorageError {
    StorageError::Sqlite {
        message: "memory store lock poisoned".to_string(),
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built records, panicking on duplicates.
    pub fn with_records(records: impl IntoIterator<Item = UnifiedRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.add(&record).expect("fixture records must have unique keys");
        }
        store
    }
}

impl IRecordStore for MemoryRecordStore {
    fn get(&self, source_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.get(source_id).cloned())
    }

    fn get_by_id(&self, record_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.values().find(|r| r.id == record_id).cloned())
    }

    fn add(&self, record: &UnifiedRecord) -> EnvcatResult<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        if records.contains_key(&record.source_id) {
            return Err(StorageError::DuplicateNaturalKey {
                source_id: record.source_id.clone(),
            }
            .into());
        }
        records.insert(record.source_id.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, source_id: &str) -> EnvcatResult<bool> {
        let removed = self
            .records
            .lock()
            .map_err(|_| poisoned())?
            .remove(source_id);
        if let Some(record) = &removed {
            self.embeddings
                .lock()
                .map_err(|_| poisoned())?
                .retain(|e| e.record_id != record.id);
        }
        Ok(removed.is_some())
    }

    fn query_by_predicate(&self, predicate: &RecordPredicate) -> EnvcatResult<Vec<UnifiedRecord>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        let title_needle = predicate.title_contains.as_deref().map(str::to_lowercase);
        let matches = records.values().filter(|r| {
            predicate.keyword.as_deref().map_or(true, |k| r.has_keyword(k))
                && title_needle
                    .as_deref()
                    .map_or(true, |t| r.title.to_lowercase().contains(t))
                && (predicate.published_from.is_none() && predicate.published_to.is_none()
                    || r.publication_date.is_some_and(|d| {
                        predicate.published_from.map_or(true, |from| d >= from)
                            && predicate.published_to.map_or(true, |to| d <= to)
                    }))
        });
        Ok(matches
            .take(predicate.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn list_all(&self) -> EnvcatResult<Vec<UnifiedRecord>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.values().cloned().collect())
    }

    fn count(&self) -> EnvcatResult<usize> {
        Ok(self.records.lock().map_err(|_| poisoned())?.len())
    }

    fn replace_embedding_records(&self, records: &[EmbeddingRecord]) -> EnvcatResult<()> {
        *self.embeddings.lock().map_err(|_| poisoned())? = records.to_vec();
        Ok(())
    }

    fn embedding_records(&self) -> EnvcatResult<Vec<EmbeddingRecord>> {
        Ok(self.embeddings.lock().map_err(|_| poisoned())?.clone())
    }
}
