/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("dataset {source_id} already exists")]
    DuplicateNaturalKey { source_id: String },

    #[error("stored value could not be decoded: {reason}")]
    Decode { reason: String },
}
