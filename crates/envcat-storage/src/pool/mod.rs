//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use envcat_core::config::StorageConfig;
use envcat_core::errors::EnvcatResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, config: &StorageConfig) -> EnvcatResult<Self> {
        let writer = WriteConnection::open(path, config.busy_timeout_ms)?;
        let readers = ReadPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool. The readers are separate databases that never
    /// see the writer's changes, so callers route reads through the writer.
    pub fn open_in_memory(config: &StorageConfig) -> EnvcatResult<Self> {
        let writer = WriteConnection::open_in_memory(config.busy_timeout_ms)?;
        let readers = ReadPool::open_in_memory(1, config.busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
