pub mod defaults;
mod embedding_config;
mod extraction_config;
mod logging_config;
mod retrieval_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use embedding_config::EmbeddingConfig;
pub use extraction_config::ExtractionConfig;
pub use logging_config::LoggingConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use crate::constants::MAX_TOP_K;
use crate::errors::{ConfigError, EnvcatResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvcatConfig {
    pub extraction: ExtractionConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub logging: LoggingConfig,
}

impl EnvcatConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> EnvcatResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML string. Missing sections take defaults.
    pub fn from_toml_str(content: &str) -> EnvcatResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EnvcatResult<()> {
        fn invalid(field: &str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field: field.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.extraction.base_url.trim().is_empty() {
            return Err(invalid("extraction.base_url", "must not be empty").into());
        }
        if self.extraction.max_retries == 0 {
            return Err(invalid("extraction.max_retries", "must be at least 1").into());
        }
        if self.extraction.batch_workers == 0 {
            return Err(invalid("extraction.batch_workers", "must be at least 1").into());
        }
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be at least 1").into());
        }
        if self.embedding.batch_size == 0 {
            return Err(invalid("embedding.batch_size", "must be at least 1").into());
        }
        if !(1..=MAX_TOP_K).contains(&self.retrieval.max_top_k) {
            return Err(invalid("retrieval.max_top_k", "must be within 1..=100").into());
        }
        if !(1..=self.retrieval.max_top_k).contains(&self.retrieval.default_top_k) {
            return Err(invalid("retrieval.default_top_k", "must be within 1..=max_top_k").into());
        }
        if self.retrieval.over_fetch_factor == 0 {
            return Err(invalid("retrieval.over_fetch_factor", "must be at least 1").into());
        }
        if self.retrieval.max_query_chars == 0 {
            return Err(invalid("retrieval.max_query_chars", "must be at least 1").into());
        }
        Ok(())
    }
}
