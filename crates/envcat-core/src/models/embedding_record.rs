use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping for one record's vector. The vector itself lives only in the
/// similarity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub record_id: String,
    pub source_id: String,
    pub model_name: String,
    pub dimensions: usize,
    /// Index build this vector belongs to.
    pub build_id: String,
    /// Position of the vector inside that build.
    pub slot: usize,
    pub created_at: DateTime<Utc>,
}
