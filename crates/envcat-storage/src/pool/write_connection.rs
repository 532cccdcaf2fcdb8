//! Single write connection behind a `std::sync::Mutex`.
//! Serialized writes, safe to call from sync code and from async tasks alike.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use envcat_core::errors::EnvcatResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection protected by a blocking mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> EnvcatResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(busy_timeout_ms: u32) -> EnvcatResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    ///
    /// Never touches a runtime, so a request handler running on a Tokio
    /// worker may call through `IRecordStore` directly.
    pub fn with_conn<F, T>(&self, f: F) -> EnvcatResult<T>
    where
        F: FnOnce(&Connection) -> EnvcatResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write lock poisoned: {e}")))?;
        f(&guard)
    }
}
