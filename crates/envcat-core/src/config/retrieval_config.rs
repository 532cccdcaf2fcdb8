use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::{MAX_QUERY_CHARS, MAX_TOP_K};

/// Query-time configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub max_query_chars: usize,
    /// Candidate multiplier applied before hybrid filtering.
    pub over_fetch_factor: usize,
    /// Query-embedding cache capacity.
    pub query_cache_size: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: defaults::DEFAULT_TOP_K,
            max_top_k: MAX_TOP_K,
            max_query_chars: MAX_QUERY_CHARS,
            over_fetch_factor: defaults::DEFAULT_OVER_FETCH_FACTOR,
            query_cache_size: defaults::DEFAULT_QUERY_CACHE_SIZE,
        }
    }
}
