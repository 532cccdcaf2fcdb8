//! # envcat-storage
//!
//! SQLite persistence for unified records.
//!
//! One `datasets` row per record, with contacts, keywords, relationships,
//! online resources and raw documents in owned tables that cascade on
//! delete. Writes go through a single serialized connection; reads use a
//! small round-robin pool of `query_only` connections when file-backed.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::SqliteRecordStore;

use envcat_core::errors::{EnvcatError, StorageError};

/// Helper to convert a message into the workspace error type.
pub(crate) fn to_storage_err(msg: String) -> EnvcatError {
    StorageError::Sqlite { message: msg }.into()
}
