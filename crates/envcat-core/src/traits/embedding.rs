use crate::errors::EnvcatResult;

/// Embedding generation provider.
///
/// One provider instance backs one index build. Vectors from different
/// providers are never comparable.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    fn embed(&self, text: &str) -> EnvcatResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Model identifier recorded alongside the index.
    fn model_name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}
