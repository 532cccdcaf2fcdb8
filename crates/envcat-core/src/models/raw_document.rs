use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceFormat;

/// Untouched payload of one successfully extracted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSourceDocument {
    pub format: SourceFormat,
    pub content: String,
    pub size_bytes: usize,
    pub retrieved_at: DateTime<Utc>,
}
