//! Hashed TF-IDF provider.
//!
//! Generates fixed-dimension vectors by hashing terms into buckets and
//! weighting them by term frequency. No external model, so it works
//! offline and in tests.

use std::collections::HashMap;

use envcat_core::errors::EnvcatResult;
use envcat_core::traits::IEmbeddingProvider;

use crate::normalize::l2_normalize;

const MODEL_NAME: &str = "hashed-tfidf";

/// Deterministic term-hashing embedding provider.
pub struct HashedTfIdfProvider {
    dimensions: usize,
}

impl HashedTfIdfProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms of two or more chars.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        let tokens = Self::tokenize(text);
        if tokens.is_empty() || self.dimensions == 0 {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms are rarer; weight them up.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        l2_normalize(&mut vec);
        vec
    }
}

impl IEmbeddingProvider for HashedTfIdfProvider {
    fn embed(&self, text: &str) -> EnvcatResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn is_available(&self) -> bool {
        true
    }
}
