//! SqliteRecordStore: owns the ConnectionPool, runs migrations at open, and
//! implements IRecordStore.

use std::path::Path;

use envcat_core::config::StorageConfig;
use envcat_core::errors::EnvcatResult;
use envcat_core::models::{EmbeddingRecord, RecordPredicate, UnifiedRecord};
use envcat_core::traits::IRecordStore;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{embedding_ops, record_crud, record_query};
use crate::to_storage_err;

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    pool: ConnectionPool,
    /// File-backed stores read through the pool. In-memory stores route
    /// reads through the writer, since pool connections are separate
    /// databases there.
    use_read_pool: bool,
}

impl SqliteRecordStore {
    /// Open the store at `config.db_path`, creating parent directories.
    pub fn open(config: &StorageConfig) -> EnvcatResult<Self> {
        let path = Path::new(&config.db_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                to_storage_err(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        Self::open_path(path, config)
    }

    /// Open a store backed by a file on disk.
    pub fn open_path(path: &Path, config: &StorageConfig) -> EnvcatResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        pool.writer.with_conn(migrations::run_migrations)?;
        tracing::debug!(path = %path.display(), readers = pool.readers.size(), "record store opened");
        Ok(Self {
            pool,
            use_read_pool: true,
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> EnvcatResult<Self> {
        let pool = ConnectionPool::open_in_memory(&StorageConfig::default())?;
        pool.writer.with_conn(migrations::run_migrations)?;
        Ok(Self {
            pool,
            use_read_pool: false,
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Current schema version.
    pub fn schema_version(&self) -> EnvcatResult<u32> {
        self.pool.writer.with_conn(migrations::current_version)
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EnvcatResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EnvcatResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl IRecordStore for SqliteRecordStore {
    fn get(&self, source_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
        self.with_reader(|conn| record_crud::get_by_source_id(conn, source_id))
    }

    fn get_by_id(&self, record_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
        self.with_reader(|conn| record_crud::get_by_id(conn, record_id))
    }

    fn add(&self, record: &UnifiedRecord) -> EnvcatResult<()> {
        self.pool.writer.with_conn(|conn| {
            record_crud::insert_record(conn, record)?;
            tracing::debug!(
                source_id = %record.source_id,
                contacts = record.contacts.len(),
                keywords = record.keywords.len(),
                documents = record.raw_documents.len(),
                "record stored"
            );
            Ok(())
        })
    }

    fn delete(&self, source_id: &str) -> EnvcatResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| record_crud::delete_record(conn, source_id))
    }

    fn query_by_predicate(&self, predicate: &RecordPredicate) -> EnvcatResult<Vec<UnifiedRecord>> {
        self.with_reader(|conn| record_query::query_by_predicate(conn, predicate))
    }

    fn list_all(&self) -> EnvcatResult<Vec<UnifiedRecord>> {
        self.with_reader(record_query::list_all)
    }

    fn count(&self) -> EnvcatResult<usize> {
        self.with_reader(record_query::count)
    }

    fn replace_embedding_records(&self, records: &[EmbeddingRecord]) -> EnvcatResult<()> {
        self.pool
            .writer
            .with_conn(|conn| embedding_ops::replace_all(conn, records))
    }

    fn embedding_records(&self) -> EnvcatResult<Vec<EmbeddingRecord>> {
        self.with_reader(embedding_ops::list_all)
    }
}
