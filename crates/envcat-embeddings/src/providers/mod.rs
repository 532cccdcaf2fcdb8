//! Provider construction.
//!
//! One configured provider backs a whole index build. There is no fallback
//! chain: vectors from two models in one index are not comparable, so a
//! provider that cannot be built is an error.

pub mod api_provider;
pub mod hashed_tfidf;
pub mod onnx_provider;

pub use api_provider::ApiProvider;
pub use hashed_tfidf::HashedTfIdfProvider;
pub use onnx_provider::OnnxProvider;

use envcat_core::config::EmbeddingConfig;
use envcat_core::errors::{EmbeddingError, EnvcatResult};
use envcat_core::traits::IEmbeddingProvider;
use tracing::info;

/// Create the configured provider, boxed.
pub fn create_provider(config: &EmbeddingConfig) -> EnvcatResult<Box<dyn IEmbeddingProvider>> {
    let provider: Box<dyn IEmbeddingProvider> = match config.provider.as_str() {
        "hashed" | "tfidf" => Box::new(HashedTfIdfProvider::new(config.dimensions)),
        "onnx" => {
            let path = config.model_path.as_deref().ok_or_else(|| {
                EmbeddingError::ModelLoadFailed {
                    path: String::new(),
                    reason: "embedding.model_path is not set".to_string(),
                }
            })?;
            Box::new(OnnxProvider::load(path, &config.model_name, config.dimensions)?)
        }
        "api" => Box::new(ApiProvider::from_config(config)?),
        other => {
            return Err(EmbeddingError::UnknownProvider {
                name: other.to_string(),
            }
            .into())
        }
    };

    info!(
        provider = %config.provider,
        model = provider.model_name(),
        dims = provider.dimensions(),
        "embedding provider ready"
    );
    Ok(provider)
}
