use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceFormat;

/// Outcome of one batch ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Datasets whose natural key was already stored.
    pub skipped_duplicates: usize,
    pub failed_ids: Vec<String>,
    /// Raw documents stored per format across successful datasets.
    pub format_counts: BTreeMap<SourceFormat, usize>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.total as f64
    }
}
