use super::{
    ConfigError, EmbeddingError, ExtractionError, IndexError, QueryError, ReconciliationError,
    StorageError,
};

/// Top-level error for every crate in the workspace.
///
/// Subsystem errors convert in via `?`. Callers that need to branch on the
/// failure class (skip a format, skip a dataset, refuse to serve) match on
/// the variant rather than on message text.
#[derive(Debug, thiserror::Error)]
pub enum EnvcatError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EnvcatError {
    /// True for store-side uniqueness violations on the natural key.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(StorageError::DuplicateNaturalKey { .. }))
    }

    /// True when the retrieval side cannot serve at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

/// Convenience alias used across the workspace.
pub type EnvcatResult<T> = Result<T, EnvcatError>;
