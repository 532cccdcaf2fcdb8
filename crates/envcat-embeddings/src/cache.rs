//! In-memory embedding cache using moka.
//!
//! Keys are blake3 hashes of the embedded text. Used on the query path so
//! repeated queries skip the provider.

use std::time::Duration;

use envcat_core::errors::EnvcatResult;
use envcat_core::traits::IEmbeddingProvider;
use moka::sync::Cache;

pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a cache holding at most `max_entries` vectors.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600)) // 1 hour idle TTL
            .time_to_live(Duration::from_secs(86400)) // 24 hour max TTL
            .build();

        Self { cache }
    }

    /// Content hash used as the cache key.
    pub fn key_for(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.cache.get(&Self::key_for(text))
    }

    pub fn insert(&self, text: &str, embedding: Vec<f32>) {
        self.cache.insert(Self::key_for(text), embedding);
    }

    /// Return the cached vector for `text`, or compute it with `embed` and
    /// cache the result. Errors are not cached.
    pub fn get_or_embed<F>(&self, text: &str, embed: F) -> EnvcatResult<Vec<f32>>
    where
        F: FnOnce(&str) -> EnvcatResult<Vec<f32>>,
    {
        let key = Self::key_for(text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let vec = embed(text)?;
        self.cache.insert(key, vec.clone());
        Ok(vec)
    }

    /// Convenience over [`Self::get_or_embed`] for a provider.
    pub fn embed_with(
        &self,
        provider: &dyn IEmbeddingProvider,
        text: &str,
    ) -> EnvcatResult<Vec<f32>> {
        self.get_or_embed(text, |t| provider.embed(t))
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use envcat_core::errors::EmbeddingError;

    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100);
        cache.insert("soil carbon", vec![1.0, 0.0]);
        assert_eq!(cache.get("soil carbon"), Some(vec![1.0, 0.0]));
        assert_eq!(cache.get("river flow"), None);
    }

    #[test]
    fn second_lookup_skips_embedding() {
        let cache = EmbeddingCache::new(100);
        let calls = Cell::new(0);
        let embed = |_: &str| {
            calls.set(calls.get() + 1);
            Ok(vec![0.5, 0.5])
        };
        let a = cache.get_or_embed("peat", embed).unwrap();
        let b = cache.get_or_embed("peat", embed).unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = EmbeddingCache::new(100);
        let result = cache.get_or_embed("peat", |_| {
            Err(EmbeddingError::InferenceFailed {
                reason: "down".into(),
            }
            .into())
        });
        assert!(result.is_err());
        assert_eq!(cache.get("peat"), None);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = EmbeddingCache::new(100);
        cache.insert("a", vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }
}
