//! Offline index build: every stored record, one provider, one build id.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use envcat_core::config::EmbeddingConfig;
use envcat_core::errors::{EmbeddingError, EnvcatResult, IndexError};
use envcat_core::models::EmbeddingRecord;
use envcat_core::traits::{IEmbeddingProvider, IRecordStore};
use envcat_core::UnifiedRecord;
use serde::Serialize;
use tracing::{debug, info};

use crate::index::{FlatIndex, IndexArtifacts, MetadataSnapshot, SlotEntry, SlotMapping, SnapshotEntry};
use crate::normalize::{l2_normalize, validate_dimensions};
use crate::synthesis::synthesize;

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub build_id: String,
    pub model_name: String,
    pub dimensions: usize,
    pub records_indexed: usize,
    pub index_dir: PathBuf,
    pub elapsed_ms: u128,
}

pub struct EmbeddingGenerator {
    config: EmbeddingConfig,
}

impl EmbeddingGenerator {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    pub fn index_dir(&self) -> &Path {
        Path::new(&self.config.index_dir)
    }

    /// Embed `records` in order and assemble the artifacts in memory.
    /// Slot `i` holds `records[i]`.
    pub fn build(
        &self,
        records: &[UnifiedRecord],
        provider: &dyn IEmbeddingProvider,
    ) -> EnvcatResult<IndexArtifacts> {
        if records.is_empty() {
            return Err(IndexError::EmptyCollection.into());
        }

        let dims = provider.dimensions();
        let build_id = uuid::Uuid::new_v4().to_string();
        let mut index = FlatIndex::new(dims);
        let batch_size = self.config.batch_size.max(1);

        for (batch_no, chunk) in records.chunks(batch_size).enumerate() {
            let texts: Vec<String> = chunk
                .iter()
                .map(|r| synthesize(r, self.config.include_lineage))
                .collect();
            let vectors = provider.embed_batch(&texts)?;
            if vectors.len() != chunk.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "provider returned {} vectors for {} texts",
                        vectors.len(),
                        chunk.len()
                    ),
                }
                .into());
            }
            for mut vector in vectors {
                validate_dimensions(&vector, dims)?;
                l2_normalize(&mut vector);
                index.push(&vector)?;
            }
            debug!(batch = batch_no, embedded = index.len(), total = records.len(), "embedded batch");
        }

        let slots = records
            .iter()
            .enumerate()
            .map(|(slot, r)| SlotEntry {
                slot,
                record_id: r.id.clone(),
                source_id: r.source_id.clone(),
            })
            .collect();
        let entries = records
            .iter()
            .enumerate()
            .map(|(slot, r)| SnapshotEntry {
                slot,
                record_id: r.id.clone(),
                source_id: r.source_id.clone(),
                title: r.title.clone(),
                abstract_preview: r.abstract_preview(self.config.preview_chars),
            })
            .collect();

        Ok(IndexArtifacts {
            index,
            mapping: SlotMapping {
                build_id: build_id.clone(),
                model_name: provider.model_name().to_string(),
                dimensions: dims,
                created_at: Utc::now(),
                slots,
            },
            snapshot: MetadataSnapshot { build_id, entries },
        })
    }

    /// Rebuild the index from scratch over every stored record, persist
    /// the artifacts, then replace the store's embedding bookkeeping.
    /// An empty store is an error and leaves the index directory untouched.
    pub fn generate_all(
        &self,
        store: &dyn IRecordStore,
        provider: &dyn IEmbeddingProvider,
    ) -> EnvcatResult<GenerationReport> {
        let started = Instant::now();
        let records = store.list_all()?;
        info!(
            records = records.len(),
            model = provider.model_name(),
            dims = provider.dimensions(),
            "starting index build"
        );

        let artifacts = self.build(&records, provider)?;
        artifacts.write(self.index_dir())?;

        let embedding_records: Vec<EmbeddingRecord> = artifacts
            .mapping
            .slots
            .iter()
            .map(|s| EmbeddingRecord {
                record_id: s.record_id.clone(),
                source_id: s.source_id.clone(),
                model_name: artifacts.mapping.model_name.clone(),
                dimensions: artifacts.mapping.dimensions,
                build_id: artifacts.mapping.build_id.clone(),
                slot: s.slot,
                created_at: artifacts.mapping.created_at,
            })
            .collect();
        store.replace_embedding_records(&embedding_records)?;

        let report = GenerationReport {
            build_id: artifacts.mapping.build_id.clone(),
            model_name: artifacts.mapping.model_name.clone(),
            dimensions: artifacts.mapping.dimensions,
            records_indexed: artifacts.len(),
            index_dir: self.index_dir().to_path_buf(),
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            build_id = %report.build_id,
            records = report.records_indexed,
            elapsed_ms = report.elapsed_ms as u64,
            "index build complete"
        );
        Ok(report)
    }
}
