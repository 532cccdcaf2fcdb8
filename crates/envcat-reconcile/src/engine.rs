//! Per-dataset orchestration: run every extractor, keep what succeeded,
//! merge.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use envcat_core::config::ExtractionConfig;
use envcat_core::errors::ReconciliationError;
use envcat_core::traits::ISourceFetcher;
use envcat_core::{EnvcatResult, SourceFormat, StructuredFields, UnifiedRecord};
use envcat_extract::SourceExtractor;

use crate::merge::{merge, SourceSet};

pub struct ReconciliationEngine {
    extractors: Vec<SourceExtractor>,
    fetcher: Arc<dyn ISourceFetcher>,
    config: ExtractionConfig,
}

impl ReconciliationEngine {
    /// Engine over all four formats.
    pub fn new(config: ExtractionConfig, fetcher: Arc<dyn ISourceFetcher>) -> Self {
        Self::with_extractors(config, fetcher, SourceExtractor::all())
    }

    pub fn with_extractors(
        config: ExtractionConfig,
        fetcher: Arc<dyn ISourceFetcher>,
        extractors: Vec<SourceExtractor>,
    ) -> Self {
        Self {
            extractors,
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn formats(&self) -> Vec<SourceFormat> {
        self.extractors.iter().map(SourceExtractor::source_type).collect()
    }

    /// Run every extractor for `natural_key` concurrently. Results come back
    /// in extractor order.
    pub fn extract_all(
        &self,
        natural_key: &str,
    ) -> Vec<(SourceFormat, EnvcatResult<StructuredFields>)> {
        self.extractors
            .par_iter()
            .map(|extractor| {
                let format = extractor.source_type();
                let location = self.config.location_for(format, natural_key);
                (format, extractor.extract(self.fetcher.as_ref(), &location))
            })
            .collect()
    }

    /// Produce one unified record for `natural_key`.
    ///
    /// Formats that fail are logged and skipped. Fails only when no format
    /// succeeds or the merged title is empty.
    pub fn reconcile(&self, natural_key: &str) -> EnvcatResult<UnifiedRecord> {
        let mut sources = SourceSet::new();
        for (format, result) in self.extract_all(natural_key) {
            match result {
                Ok(fields) => {
                    if let Some(id) = fields.identifier.as_deref().filter(|id| *id != natural_key) {
                        warn!(
                            source_id = natural_key,
                            %format,
                            reported = id,
                            "source reports a different identifier"
                        );
                    }
                    debug!(source_id = natural_key, %format, "format extracted");
                    sources.insert(fields);
                }
                Err(e) => {
                    warn!(source_id = natural_key, %format, error = %e, "format unavailable");
                }
            }
        }

        if sources.is_empty() {
            return Err(ReconciliationError::AllSourcesFailed {
                source_id: natural_key.to_string(),
                attempted: self.extractors.len(),
            }
            .into());
        }

        let record = merge(natural_key, &sources)?;
        info!(
            source_id = natural_key,
            formats = sources.len(),
            contacts = record.contacts.len(),
            keywords = record.keywords.len(),
            "dataset reconciled"
        );
        Ok(record)
    }
}
