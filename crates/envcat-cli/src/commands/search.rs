use std::io::Write;

use envcat_core::models::RankedResult;
use envcat_core::EnvcatConfig;
use envcat_embeddings::create_provider;
use envcat_retrieval::{RetrievalContext, RetrievalEngine};

use super::open_store;
use crate::args::SearchArgs;

/// Load the context eagerly, then run semantic or hybrid search.
pub fn search(config: &EnvcatConfig, args: &SearchArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let context = RetrievalContext::open(config, create_provider(&config.embedding)?)?;
    let engine = RetrievalEngine::new(&context, &store);

    let top_k = args.top_k.unwrap_or(config.retrieval.default_top_k);
    let filters = args.filters();
    let results = if filters.is_empty() {
        engine.semantic_search(&args.query, top_k)?
    } else {
        engine.hybrid_search(&args.query, &filters, top_k)?
    };

    if args.json {
        let summaries: Vec<serde_json::Value> = results.iter().map(result_json).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
        return Ok(());
    }

    if results.is_empty() {
        writeln!(out, "no results")?;
    }
    for r in &results {
        writeln!(out, "{:>3}. [{:.3}] {}", r.rank, r.relevance, r.title)?;
        writeln!(out, "     {}", r.source_id)?;
        if let Some(preview) = &r.abstract_preview {
            let line: String = preview.chars().take(120).collect();
            writeln!(out, "     {line}")?;
        }
    }
    Ok(())
}

fn result_json(r: &RankedResult) -> serde_json::Value {
    serde_json::json!({
        "rank": r.rank,
        "source_id": r.source_id,
        "record_id": r.record_id,
        "title": r.title,
        "abstract_preview": r.abstract_preview,
        "similarity": r.similarity,
        "relevance": r.relevance,
        "publication_date": r.record.as_ref().and_then(|rec| rec.publication_date),
        "keywords": r.record.as_ref().map(|rec| {
            rec.keywords.iter().map(|k| k.text.clone()).collect::<Vec<_>>()
        }),
    })
}
