//! Batch ingestion: reconcile and persist many datasets, each in its own
//! transaction, reporting outcomes as counts.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{error, info, warn};

use envcat_core::constants::BATCH_PROGRESS_INTERVAL;
use envcat_core::errors::ConfigError;
use envcat_core::models::BatchSummary;
use envcat_core::traits::IRecordStore;
use envcat_core::{EnvcatResult, SourceFormat};

use crate::engine::ReconciliationEngine;

#[derive(Debug)]
enum Outcome {
    Stored(Vec<SourceFormat>),
    Duplicate,
    Failed,
}

pub struct BatchIngestor {
    engine: ReconciliationEngine,
    workers: usize,
    polite_delay: Duration,
}

impl BatchIngestor {
    pub fn new(engine: ReconciliationEngine) -> Self {
        let workers = engine.config().batch_workers.max(1);
        let polite_delay = Duration::from_millis(engine.config().polite_delay_ms);
        Self {
            engine,
            workers,
            polite_delay,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// Ingest every id. Never fails as a whole: per-dataset errors are
    /// logged and counted.
    pub fn run(&self, ids: &[String], store: &dyn IRecordStore) -> BatchSummary {
        let started_at = Utc::now();
        let processed = AtomicUsize::new(0);
        let total = ids.len();
        info!(total, workers = self.workers, "batch ingestion started");

        let step = |id: &String| {
            let outcome = self.ingest_one(id, store);
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % BATCH_PROGRESS_INTERVAL == 0 {
                info!(done, total, "batch progress");
            }
            outcome
        };

        let outcomes: Vec<Outcome> = if self.workers == 1 {
            ids.iter()
                .enumerate()
                .map(|(i, id)| {
                    if i > 0 && !self.polite_delay.is_zero() {
                        std::thread::sleep(self.polite_delay);
                    }
                    step(id)
                })
                .collect()
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(self.workers).build() {
                Ok(pool) => pool.install(|| ids.par_iter().map(&step).collect::<Vec<_>>()),
                Err(e) => {
                    warn!(error = %e, "worker pool unavailable, ingesting sequentially");
                    ids.iter().map(&step).collect()
                }
            }
        };

        let mut summary = BatchSummary {
            total,
            succeeded: 0,
            failed: 0,
            skipped_duplicates: 0,
            failed_ids: Vec::new(),
            format_counts: BTreeMap::new(),
            started_at,
            finished_at: started_at,
        };
        for (id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Outcome::Stored(formats) => {
                    summary.succeeded += 1;
                    for format in formats {
                        *summary.format_counts.entry(format).or_default() += 1;
                    }
                }
                Outcome::Duplicate => summary.skipped_duplicates += 1,
                Outcome::Failed => {
                    summary.failed += 1;
                    summary.failed_ids.push(id.clone());
                }
            }
        }
        summary.finished_at = Utc::now();

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped_duplicates = summary.skipped_duplicates,
            "batch ingestion finished"
        );
        summary
    }

    fn ingest_one(&self, id: &str, store: &dyn IRecordStore) -> Outcome {
        match store.get(id) {
            Ok(Some(_)) => {
                info!(source_id = id, "already stored, skipping");
                return Outcome::Duplicate;
            }
            Ok(None) => {}
            Err(e) => {
                error!(source_id = id, error = %e, "store lookup failed");
                return Outcome::Failed;
            }
        }

        let record = match self.engine.reconcile(id) {
            Ok(record) => record,
            Err(e) => {
                error!(source_id = id, error = %e, "dataset reconciliation failed");
                return Outcome::Failed;
            }
        };

        match store.add(&record) {
            Ok(()) => Outcome::Stored(record.raw_documents.iter().map(|d| d.format).collect()),
            Err(e) if e.is_duplicate() => {
                info!(source_id = id, "stored concurrently, skipping");
                Outcome::Duplicate
            }
            Err(e) => {
                error!(source_id = id, error = %e, "dataset persistence failed");
                Outcome::Failed
            }
        }
    }
}

/// Natural keys from a text file, one per line. Blank lines and `#`
/// comments are skipped.
pub fn read_identifier_file(path: &Path) -> EnvcatResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
