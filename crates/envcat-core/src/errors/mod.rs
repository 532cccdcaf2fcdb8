mod config_error;
mod embedding_error;
mod envcat_error;
mod extraction_error;
mod index_error;
mod query_error;
mod reconciliation_error;
mod storage_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use envcat_error::{EnvcatError, EnvcatResult};
pub use extraction_error::ExtractionError;
pub use index_error::IndexError;
pub use query_error::QueryError;
pub use reconciliation_error::ReconciliationError;
pub use storage_error::StorageError;
