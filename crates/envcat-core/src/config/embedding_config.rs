use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "hashed", "onnx", "api".
    pub provider: String,
    /// Model identifier recorded with the index.
    pub model_name: String,
    /// Path to the ONNX model file.
    pub model_path: Option<String>,
    /// OpenAI-compatible `/embeddings` endpoint.
    pub api_endpoint: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub dimensions: usize,
    pub batch_size: usize,
    /// Append lineage to the synthesized text.
    pub include_lineage: bool,
    /// Directory holding the three index artifacts.
    pub index_dir: String,
    /// Abstract length kept in the metadata snapshot, in characters.
    pub preview_chars: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model_name: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            model_path: None,
            api_endpoint: None,
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            include_lineage: defaults::DEFAULT_INCLUDE_LINEAGE,
            index_dir: defaults::DEFAULT_INDEX_DIR.to_string(),
            preview_chars: defaults::DEFAULT_PREVIEW_CHARS,
        }
    }
}
