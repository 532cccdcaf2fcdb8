//! Index builds over the sample catalogue: artifacts on disk, bookkeeping in
//! the store, and ranking over the built vectors.

use envcat_core::config::EmbeddingConfig;
use envcat_core::errors::{EmbeddingError, EnvcatResult, IndexError};
use envcat_core::traits::{IEmbeddingProvider, IRecordStore};
use envcat_core::EnvcatError;
use envcat_embeddings::normalize::{dot, l2_normalize};
use envcat_embeddings::{EmbeddingGenerator, HashedTfIdfProvider, IndexArtifacts};
use test_fixtures::{
    sample_catalogue, sample_record, MemoryRecordStore, PEAT_CARBON_ID, RIVER_FLOW_ID,
    SOIL_CARBON_ID,
};

fn config(dir: &std::path::Path) -> EmbeddingConfig {
    EmbeddingConfig {
        index_dir: dir.display().to_string(),
        batch_size: 2,
        ..Default::default()
    }
}

/// Always returns vectors one element short.
struct ShortProvider;

impl IEmbeddingProvider for ShortProvider {
    fn embed(&self, _text: &str) -> EnvcatResult<Vec<f32>> {
        Ok(vec![1.0; 7])
    }
    fn embed_batch(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0; 7]).collect())
    }
    fn dimensions(&self) -> usize {
        8
    }
    fn model_name(&self) -> &str {
        "short"
    }
    fn is_available(&self) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL BUILD
// ═══════════════════════════════════════════════════════════════════════════

/// Slots follow natural-key order; the store records the same build.
#[test]
fn build_writes_artifacts_and_bookkeeping() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryRecordStore::with_records(sample_catalogue());
    let provider = HashedTfIdfProvider::new(384);

    let report = EmbeddingGenerator::new(config(dir.path()))
        .generate_all(&store, &provider)
        .unwrap();
    assert_eq!(report.records_indexed, 3);
    assert_eq!(report.model_name, "hashed-tfidf");
    assert_eq!(report.dimensions, 384);

    let artifacts = IndexArtifacts::load(dir.path()).unwrap();
    assert_eq!(artifacts.build_id(), report.build_id);
    let order: Vec<&str> = artifacts
        .mapping
        .slots
        .iter()
        .map(|s| s.source_id.as_str())
        .collect();
    assert_eq!(order, vec![RIVER_FLOW_ID, SOIL_CARBON_ID, PEAT_CARBON_ID]);

    let bookkeeping = store.embedding_records().unwrap();
    assert_eq!(bookkeeping.len(), 3);
    assert!(bookkeeping.iter().all(|e| e.build_id == report.build_id));
    assert_eq!(bookkeeping[1].record_id, format!("rec-{SOIL_CARBON_ID}"));
    assert_eq!(bookkeeping[1].slot, 1);
}

/// Every stored vector has unit length.
#[test]
fn vectors_are_unit_length() {
    let dir = tempfile::tempdir().unwrap();
    let generator = EmbeddingGenerator::new(config(dir.path()));
    let artifacts = generator
        .build(&sample_catalogue(), &HashedTfIdfProvider::new(384))
        .unwrap();
    for slot in 0..artifacts.len() {
        let v = artifacts.index.vector(slot).unwrap();
        assert!((dot(v, v).sqrt() - 1.0).abs() < 1e-5);
    }
}

/// The same records and model yield identical vectors across builds.
#[test]
fn builds_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let generator = EmbeddingGenerator::new(config(dir.path()));
    let provider = HashedTfIdfProvider::new(128);
    let a = generator.build(&sample_catalogue(), &provider).unwrap();
    let b = generator.build(&sample_catalogue(), &provider).unwrap();
    assert_eq!(a.index, b.index);
    assert_ne!(a.build_id(), b.build_id());
}

/// A second run replaces everything from the first.
#[test]
fn rebuild_replaces_previous_build() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryRecordStore::with_records(sample_catalogue());
    let generator = EmbeddingGenerator::new(config(dir.path()));
    let provider = HashedTfIdfProvider::new(64);

    let first = generator.generate_all(&store, &provider).unwrap();
    store.delete(PEAT_CARBON_ID).unwrap();
    let second = generator.generate_all(&store, &provider).unwrap();

    assert_ne!(first.build_id, second.build_id);
    assert_eq!(second.records_indexed, 2);
    let artifacts = IndexArtifacts::load(dir.path()).unwrap();
    assert_eq!(artifacts.build_id(), second.build_id);
    let bookkeeping = store.embedding_records().unwrap();
    assert_eq!(bookkeeping.len(), 2);
    assert!(bookkeeping.iter().all(|e| e.build_id == second.build_id));
}

/// Snapshot previews are cut to the configured length.
#[test]
fn snapshot_previews_are_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.preview_chars = 12;
    let artifacts = EmbeddingGenerator::new(config)
        .build(&sample_catalogue(), &HashedTfIdfProvider::new(64))
        .unwrap();
    let soil = artifacts.snapshot.entry(0).unwrap();
    assert_eq!(soil.title, "Soil Carbon Survey 2020");
    assert_eq!(soil.abstract_preview.as_deref(), Some("Topsoil orga"));
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

/// Nothing to index is an error and leaves no artifacts behind.
#[test]
fn empty_store_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let index_dir = dir.path().join("index");
    let store = MemoryRecordStore::new();
    let err = EmbeddingGenerator::new(config(&index_dir))
        .generate_all(&store, &HashedTfIdfProvider::new(64))
        .unwrap_err();
    assert!(matches!(err, EnvcatError::Index(IndexError::EmptyCollection)));
    assert!(!index_dir.exists());
}

/// A provider that returns the wrong vector length aborts the build.
#[test]
fn wrong_dimensions_abort_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryRecordStore::with_records(sample_catalogue());
    let err = EmbeddingGenerator::new(config(dir.path()))
        .generate_all(&store, &ShortProvider)
        .unwrap_err();
    assert!(matches!(
        err,
        EnvcatError::Embedding(EmbeddingError::DimensionMismatch { expected: 8, actual: 7 })
    ));
    assert!(!IndexArtifacts::exists(dir.path()));
    assert!(store.embedding_records().unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// RANKING OVER THE BUILT INDEX
// ═══════════════════════════════════════════════════════════════════════════

/// "soil carbon" ranks the soil survey above the river gauging record.
#[test]
fn soil_query_ranks_soil_first() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        sample_record(SOIL_CARBON_ID, "Soil Carbon Survey 2020", None),
        sample_record(RIVER_FLOW_ID, "River Flow Gauging", None),
    ];
    let provider = HashedTfIdfProvider::new(384);
    let artifacts = EmbeddingGenerator::new(config(dir.path()))
        .build(&records, &provider)
        .unwrap();

    let mut query = provider.embed("soil carbon").unwrap();
    l2_normalize(&mut query);
    let hits = artifacts.index.search(&query, 2).unwrap();
    let top = artifacts.mapping.entry(hits[0].0).unwrap();
    assert_eq!(top.source_id, SOIL_CARBON_ID);
    assert!(hits[0].1 > hits[1].1);
}
