//! Explicit retrieval lifecycle: `Unloaded → Loading → Ready`, or `Failed`
//! when any part of the load is rejected.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use envcat_core::config::{EnvcatConfig, RetrievalConfig};
use envcat_core::errors::{EnvcatResult, IndexError};
use envcat_core::traits::IEmbeddingProvider;
use envcat_embeddings::normalize::{l2_normalize, validate_dimensions};
use envcat_embeddings::{EmbeddingCache, IndexArtifacts};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextState {
    Unloaded,
    Loading,
    Ready,
    /// Load was refused; the reason is kept for reporting.
    Failed(String),
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => f.write_str("unloaded"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Loaded index, model and query cache. Immutable once `Ready`, so any
/// number of queries may share one `&RetrievalContext`.
pub struct RetrievalContext {
    config: RetrievalConfig,
    state: ContextState,
    artifacts: Option<IndexArtifacts>,
    provider: Option<Box<dyn IEmbeddingProvider>>,
    cache: EmbeddingCache,
}

impl RetrievalContext {
    pub fn new(config: RetrievalConfig) -> Self {
        let cache = EmbeddingCache::new(config.query_cache_size);
        Self {
            config,
            state: ContextState::Unloaded,
            artifacts: None,
            provider: None,
            cache,
        }
    }

    /// Build and load in one step, returning only a `Ready` context.
    pub fn open(config: &EnvcatConfig, provider: Box<dyn IEmbeddingProvider>) -> EnvcatResult<Self> {
        let mut context = Self::new(config.retrieval.clone());
        context.load(Path::new(&config.embedding.index_dir), provider)?;
        Ok(context)
    }

    /// Read the artifacts in `index_dir` and bind `provider` to them.
    ///
    /// The provider must be the model the index was built with, at the same
    /// dimensions. On any failure the context moves to `Failed` and the
    /// error is returned.
    pub fn load(&mut self, index_dir: &Path, provider: Box<dyn IEmbeddingProvider>) -> EnvcatResult<()> {
        self.state = ContextState::Loading;
        self.artifacts = None;
        self.provider = None;
        self.cache.clear();

        match Self::load_artifacts(index_dir, provider.as_ref()) {
            Ok(artifacts) => {
                info!(
                    build_id = artifacts.build_id(),
                    vectors = artifacts.len(),
                    model = provider.model_name(),
                    "retrieval context ready"
                );
                self.artifacts = Some(artifacts);
                self.provider = Some(provider);
                self.state = ContextState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, dir = %index_dir.display(), "retrieval context failed to load");
                self.state = ContextState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn load_artifacts(index_dir: &Path, provider: &dyn IEmbeddingProvider) -> EnvcatResult<IndexArtifacts> {
        let artifacts = IndexArtifacts::load(index_dir)?;
        let mapping = &artifacts.mapping;
        if mapping.model_name != provider.model_name() || mapping.dimensions != provider.dimensions() {
            return Err(IndexError::ModelMismatch {
                index_model: mapping.model_name.clone(),
                index_dims: mapping.dimensions,
                model: provider.model_name().to_string(),
                dims: provider.dimensions(),
            }
            .into());
        }
        if !provider.is_available() {
            return Err(envcat_core::errors::EmbeddingError::ProviderUnavailable {
                provider: provider.model_name().to_string(),
            }
            .into());
        }
        Ok(artifacts)
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ContextState::Ready
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Artifacts and provider, or `NotLoaded` unless `Ready`.
    pub fn ready(&self) -> EnvcatResult<(&IndexArtifacts, &dyn IEmbeddingProvider)> {
        match (&self.state, &self.artifacts, &self.provider) {
            (ContextState::Ready, Some(artifacts), Some(provider)) => Ok((artifacts, provider.as_ref())),
            _ => Err(IndexError::NotLoaded {
                state: self.state.to_string(),
            }
            .into()),
        }
    }

    /// Query vector with the same post-processing as generation. Cached by
    /// query text.
    pub fn embed_query(&self, query: &str) -> EnvcatResult<Vec<f32>> {
        let (_, provider) = self.ready()?;
        let mut vector = self.cache.embed_with(provider, query)?;
        validate_dimensions(&vector, provider.dimensions())?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Top `k` slots for a query vector. Equal scores order by natural key.
    pub fn nearest(&self, vector: &[f32], k: usize) -> EnvcatResult<Vec<(usize, f32)>> {
        let (artifacts, _) = self.ready()?;
        let slots = &artifacts.mapping.slots;
        artifacts.index.search_with(vector, k, |a, b| {
            match (slots.get(a), slots.get(b)) {
                (Some(x), Some(y)) => x.source_id.cmp(&y.source_id),
                _ => Ordering::Equal,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envcat_embeddings::{EmbeddingGenerator, HashedTfIdfProvider};
    use envcat_core::config::EmbeddingConfig;
    use test_fixtures::sample_catalogue;

    fn built_index(dims: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let config = EmbeddingConfig {
            index_dir: dir.path().display().to_string(),
            ..Default::default()
        };
        EmbeddingGenerator::new(config)
            .build(&sample_catalogue(), &HashedTfIdfProvider::new(dims))
            .unwrap()
            .write(dir.path())
            .unwrap();
        dir
    }

    #[test]
    fn new_context_refuses_queries() {
        let context = RetrievalContext::new(RetrievalConfig::default());
        assert_eq!(context.state(), &ContextState::Unloaded);
        let err = context.embed_query("soil").unwrap_err();
        assert!(err.to_string().contains("unloaded"));
    }

    #[test]
    fn load_reaches_ready() {
        let dir = built_index(64);
        let mut context = RetrievalContext::new(RetrievalConfig::default());
        context
            .load(dir.path(), Box::new(HashedTfIdfProvider::new(64)))
            .unwrap();
        assert!(context.is_ready());
        assert_eq!(context.embed_query("soil").unwrap().len(), 64);
    }

    #[test]
    fn model_mismatch_fails_the_load() {
        let dir = built_index(64);
        let mut context = RetrievalContext::new(RetrievalConfig::default());
        let err = context
            .load(dir.path(), Box::new(HashedTfIdfProvider::new(128)))
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(matches!(context.state(), ContextState::Failed(_)));
        assert!(context.ready().is_err());
    }

    #[test]
    fn missing_index_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = RetrievalContext::new(RetrievalConfig::default());
        assert!(context
            .load(dir.path(), Box::new(HashedTfIdfProvider::new(64)))
            .is_err());
        match context.state() {
            ContextState::Failed(reason) => assert!(reason.contains("missing")),
            other => panic!("unexpected state {other}"),
        }
    }
}
