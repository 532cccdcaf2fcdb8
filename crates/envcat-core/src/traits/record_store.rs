use crate::errors::EnvcatResult;
use crate::models::{EmbeddingRecord, RecordPredicate, UnifiedRecord};

/// Persistence boundary for unified records.
pub trait IRecordStore: Send + Sync {
    // --- Lookup ---
    /// Point lookup by natural key.
    fn get(&self, source_id: &str) -> EnvcatResult<Option<UnifiedRecord>>;
    /// Point lookup by surrogate key.
    fn get_by_id(&self, record_id: &str) -> EnvcatResult<Option<UnifiedRecord>>;

    // --- Write ---
    /// Insert a record with all owned collections in one transaction.
    /// Fails with a uniqueness violation when the natural key exists.
    fn add(&self, record: &UnifiedRecord) -> EnvcatResult<()>;
    /// Remove a record and everything it owns. Returns whether it existed.
    fn delete(&self, source_id: &str) -> EnvcatResult<bool>;

    // --- Query ---
    fn query_by_predicate(&self, predicate: &RecordPredicate) -> EnvcatResult<Vec<UnifiedRecord>>;
    /// All records ordered by natural key.
    fn list_all(&self) -> EnvcatResult<Vec<UnifiedRecord>>;
    fn count(&self) -> EnvcatResult<usize>;

    // --- Embeddings ---
    /// Atomically replace every embedding record.
    fn replace_embedding_records(&self, records: &[EmbeddingRecord]) -> EnvcatResult<()>;
    fn embedding_records(&self) -> EnvcatResult<Vec<EmbeddingRecord>>;
}
