//! RetrievalEngine: semantic and hybrid search over a ready context.

use envcat_core::errors::EnvcatResult;
use envcat_core::models::{RankedResult, SearchFilters};
use envcat_core::traits::IRecordStore;
use tracing::{debug, info};

use crate::context::RetrievalContext;
use crate::filters;
use crate::validation::{validate_filters, validate_query};

/// Map an inner product in [-1, 1] onto [0, 1].
pub fn relevance(similarity: f32) -> f32 {
    ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

pub struct RetrievalEngine<'a> {
    context: &'a RetrievalContext,
    store: &'a dyn IRecordStore,
}

impl<'a> RetrievalEngine<'a> {
    pub fn new(context: &'a RetrievalContext, store: &'a dyn IRecordStore) -> Self {
        Self { context, store }
    }

    /// Top `top_k` records by similarity to `query`, rank 1 first.
    pub fn semantic_search(&self, query: &str, top_k: usize) -> EnvcatResult<Vec<RankedResult>> {
        let query = validate_query(query, top_k, self.context.config())?;
        let results = self.candidates(query, top_k)?;
        info!(query, top_k, results = results.len(), "semantic search");
        Ok(results)
    }

    /// Semantic search over `top_k × over_fetch_factor` candidates, then
    /// keep those passing every filter, in similarity order, up to `top_k`.
    /// Returns fewer than `top_k` rather than searching again.
    pub fn hybrid_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        top_k: usize,
    ) -> EnvcatResult<Vec<RankedResult>> {
        let query = validate_query(query, top_k, self.context.config())?;
        validate_filters(filters)?;

        let fetch = top_k.saturating_mul(self.context.config().over_fetch_factor.max(1));
        let candidates = self.candidates(query, fetch)?;
        let fetched = candidates.len();

        let mut results: Vec<RankedResult> = if filters.is_empty() {
            candidates
        } else {
            candidates
                .into_iter()
                .filter(|c| c.record.as_ref().is_some_and(|r| filters::matches(r, filters)))
                .collect()
        };
        results.truncate(top_k);
        for (i, r) in results.iter_mut().enumerate() {
            r.rank = i + 1;
        }

        debug!(fetched, kept = results.len(), "hybrid filter applied");
        info!(query, top_k, results = results.len(), "hybrid search");
        Ok(results)
    }

    /// Nearest `k` with records attached. Preview fields come from the
    /// metadata snapshot, so a record gone from the store still appears.
    fn candidates(&self, query: &str, k: usize) -> EnvcatResult<Vec<RankedResult>> {
        let (artifacts, _) = self.context.ready()?;
        let vector = self.context.embed_query(query)?;
        let hits = self.context.nearest(&vector, k)?;

        let mut results = Vec::with_capacity(hits.len());
        for (slot, similarity) in hits {
            let Some(entry) = artifacts.snapshot.entry(slot) else {
                continue;
            };
            let record = self.store.get_by_id(&entry.record_id)?;
            if record.is_none() {
                debug!(record_id = %entry.record_id, "indexed record missing from store");
            }
            results.push(RankedResult {
                rank: results.len() + 1,
                record_id: entry.record_id.clone(),
                source_id: entry.source_id.clone(),
                title: entry.title.clone(),
                abstract_preview: entry.abstract_preview.clone(),
                similarity,
                relevance: relevance(similarity),
                record,
            });
        }
        Ok(results)
    }
}
