use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use envcat_core::EnvcatConfig;
use envcat_extract::HttpFetcher;
use envcat_reconcile::{read_identifier_file, BatchIngestor, ReconciliationEngine};

use super::open_store;

/// Reconcile every listed dataset into the store and print the summary.
/// Per-dataset failures are counted, not raised.
pub fn ingest(config: &EnvcatConfig, ids_path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let ids = read_identifier_file(ids_path)
        .with_context(|| format!("reading identifiers from {}", ids_path.display()))?;
    let store = open_store(config)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.extraction)?);
    let ingestor = BatchIngestor::new(ReconciliationEngine::new(config.extraction.clone(), fetcher));

    let summary = ingestor.run(&ids, &store);

    writeln!(out, "datasets:   {}", summary.total)?;
    writeln!(out, "succeeded:  {}", summary.succeeded)?;
    writeln!(out, "duplicates: {}", summary.skipped_duplicates)?;
    writeln!(out, "failed:     {}", summary.failed)?;
    writeln!(out, "success:    {:.1}%", summary.success_rate() * 100.0)?;
    for (format, count) in &summary.format_counts {
        writeln!(out, "  {format:<7} {count}")?;
    }
    for id in &summary.failed_ids {
        writeln!(out, "failed: {id}")?;
    }
    Ok(())
}
