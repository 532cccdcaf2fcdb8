use std::io::Write;

use envcat_core::EnvcatConfig;
use envcat_embeddings::{create_provider, EmbeddingGenerator};

use super::open_store;

/// Rebuild the index from scratch over the whole store.
pub fn embed(config: &EnvcatConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let provider = create_provider(&config.embedding)?;
    let report = EmbeddingGenerator::new(config.embedding.clone()).generate_all(&store, provider.as_ref())?;

    writeln!(out, "build:      {}", report.build_id)?;
    writeln!(out, "model:      {} ({} dims)", report.model_name, report.dimensions)?;
    writeln!(out, "records:    {}", report.records_indexed)?;
    writeln!(out, "index dir:  {}", report.index_dir.display())?;
    writeln!(out, "elapsed:    {} ms", report.elapsed_ms)?;
    Ok(())
}
