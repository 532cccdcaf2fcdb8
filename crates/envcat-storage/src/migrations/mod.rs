//! Schema migrations using PRAGMA user_version.

pub mod v001_datasets;
pub mod v002_embeddings;

use rusqlite::Connection;

use envcat_core::errors::{EnvcatResult, StorageError};

use crate::to_storage_err;

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations, each in its own transaction.
pub fn run_migrations(conn: &Connection) -> EnvcatResult<()> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_datasets::MIGRATION_SQL, 1),
        (v002_embeddings::MIGRATION_SQL, 2),
    ];

    for &(sql, version) in migrations {
        if current >= version {
            continue;
        }
        let failed = |e: rusqlite::Error| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> EnvcatResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
