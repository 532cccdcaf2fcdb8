//! Semantic and hybrid search end to end: sample catalogue in SQLite, index
//! built by the generator, context loaded from disk.

use chrono::NaiveDate;
use envcat_core::config::EnvcatConfig;
use envcat_core::errors::{IndexError, QueryError};
use envcat_core::models::{SearchFilters, SpatialExtent};
use envcat_core::traits::IRecordStore;
use envcat_core::EnvcatError;
use envcat_embeddings::{EmbeddingGenerator, HashedTfIdfProvider};
use envcat_retrieval::{ContextState, RetrievalContext, RetrievalEngine};
use envcat_storage::SqliteRecordStore;
use tempfile::TempDir;
use test_fixtures::{sample_catalogue, PEAT_CARBON_ID, RIVER_FLOW_ID, SOIL_CARBON_ID};

const DIMS: usize = 384;

struct Fixture {
    _dir: TempDir,
    config: EnvcatConfig,
    store: SqliteRecordStore,
    context: RetrievalContext,
}

impl Fixture {
    fn engine(&self) -> RetrievalEngine<'_> {
        RetrievalEngine::new(&self.context, &self.store)
    }
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EnvcatConfig::default();
    config.embedding.index_dir = dir.path().join("index").display().to_string();
    config.embedding.dimensions = DIMS;

    let store = SqliteRecordStore::open_in_memory().unwrap();
    for record in sample_catalogue() {
        store.add(&record).unwrap();
    }
    EmbeddingGenerator::new(config.embedding.clone())
        .generate_all(&store, &HashedTfIdfProvider::new(DIMS))
        .unwrap();
    let context = RetrievalContext::open(&config, Box::new(HashedTfIdfProvider::new(DIMS))).unwrap();

    Fixture {
        _dir: dir,
        config,
        store,
        context,
    }
}

fn source_ids(results: &[envcat_core::models::RankedResult]) -> Vec<&str> {
    results.iter().map(|r| r.source_id.as_str()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC SEARCH
// ═══════════════════════════════════════════════════════════════════════════

/// The soil survey is the best match for "soil carbon"; the river record
/// is the worst.
#[test]
fn soil_query_ranks_soil_first() {
    let f = fixture();
    let results = f.engine().semantic_search("soil carbon", 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].source_id, SOIL_CARBON_ID);
    assert_eq!(results[2].source_id, RIVER_FLOW_ID);

    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.rank, i + 1);
        assert!((0.0..=1.0).contains(&r.relevance));
        assert_eq!(r.record.as_ref().unwrap().source_id, r.source_id);
    }
    assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    assert_eq!(results[0].title, "Soil Carbon Survey 2020");
    assert!(results[0].abstract_preview.as_deref().unwrap().starts_with("Topsoil"));
}

/// Repeated calls against an unchanged index return the same order.
#[test]
fn ranking_is_stable() {
    let f = fixture();
    let engine = f.engine();
    let first = engine.semantic_search("upland peat in wales", 3).unwrap();
    for _ in 0..5 {
        let again = engine.semantic_search("upland peat in wales", 3).unwrap();
        assert_eq!(source_ids(&again), source_ids(&first));
    }
    assert_eq!(first[0].source_id, PEAT_CARBON_ID);
}

/// Asking for more than the collection holds returns the whole collection.
#[test]
fn top_k_larger_than_collection() {
    let f = fixture();
    assert_eq!(f.engine().semantic_search("river", 50).unwrap().len(), 3);
    assert_eq!(f.engine().semantic_search("river", 1).unwrap().len(), 1);
}

/// A record deleted after the build keeps its preview but loses `record`.
#[test]
fn deleted_record_keeps_preview() {
    let f = fixture();
    f.store.delete(RIVER_FLOW_ID).unwrap();
    let results = f.engine().semantic_search("river discharge", 3).unwrap();
    let river = results.iter().find(|r| r.source_id == RIVER_FLOW_ID).unwrap();
    assert!(river.record.is_none());
    assert_eq!(river.title, "River Flow Gauging Network Daily Flows");

    let hydrology = SearchFilters {
        keywords: vec!["Hydrology".into()],
        ..Default::default()
    };
    let filtered = f
        .engine()
        .hybrid_search("river discharge", &hydrology, 3)
        .unwrap();
    assert!(filtered.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// HYBRID SEARCH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyword_filter() {
    let f = fixture();
    let filters = SearchFilters {
        keywords: vec!["peatland".into()],
        ..Default::default()
    };
    let results = f.engine().hybrid_search("soil carbon", &filters, 5).unwrap();
    assert_eq!(source_ids(&results), vec![PEAT_CARBON_ID]);
    assert_eq!(results[0].rank, 1);
}

/// Shared keyword keeps both carbon records in similarity order.
#[test]
fn shared_keyword_keeps_order() {
    let f = fixture();
    let filters = SearchFilters {
        keywords: vec!["Soil organic carbon".into()],
        ..Default::default()
    };
    let results = f.engine().hybrid_search("soil carbon", &filters, 5).unwrap();
    assert_eq!(source_ids(&results), vec![SOIL_CARBON_ID, PEAT_CARBON_ID]);
    assert_eq!(results[1].rank, 2);
}

#[test]
fn date_range_filter() {
    let f = fixture();
    let filters = SearchFilters {
        date_from: NaiveDate::from_ymd_opt(2019, 1, 1),
        date_to: NaiveDate::from_ymd_opt(2021, 12, 31),
        ..Default::default()
    };
    let results = f.engine().hybrid_search("carbon", &filters, 5).unwrap();
    assert_eq!(source_ids(&results), vec![SOIL_CARBON_ID]);
}

#[test]
fn spatial_filter() {
    let f = fixture();
    let scotland = SearchFilters {
        spatial_bounds: Some(SpatialExtent::new(-7.0, -1.0, 56.0, 58.5)),
        ..Default::default()
    };
    let results = f.engine().hybrid_search("carbon", &scotland, 5).unwrap();
    assert_eq!(source_ids(&results), vec![SOIL_CARBON_ID]);
}

#[test]
fn author_and_organisation_filters() {
    let f = fixture();
    let by_author = SearchFilters {
        authors: vec!["hannaford".into()],
        ..Default::default()
    };
    let results = f.engine().hybrid_search("carbon", &by_author, 5).unwrap();
    assert_eq!(source_ids(&results), vec![RIVER_FLOW_ID]);

    let by_org = SearchFilters {
        organisations: vec!["Centre for Ecology".into()],
        ..Default::default()
    };
    let results = f.engine().hybrid_search("carbon", &by_org, 5).unwrap();
    assert_eq!(results.len(), 2);
    assert!(!source_ids(&results).contains(&PEAT_CARBON_ID));
}

/// Filters that nothing passes give an empty list, not an error.
#[test]
fn unsatisfiable_filters_return_nothing() {
    let f = fixture();
    let filters = SearchFilters {
        keywords: vec!["Peatland".into(), "Hydrology".into()],
        ..Default::default()
    };
    assert!(f.engine().hybrid_search("soil", &filters, 5).unwrap().is_empty());
}

#[test]
fn empty_filters_match_semantic() {
    let f = fixture();
    let engine = f.engine();
    let semantic = engine.semantic_search("soil carbon", 2).unwrap();
    let hybrid = engine
        .hybrid_search("soil carbon", &SearchFilters::default(), 2)
        .unwrap();
    assert_eq!(source_ids(&hybrid), source_ids(&semantic));
}

// ═══════════════════════════════════════════════════════════════════════════
// REJECTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn malformed_queries_are_rejected() {
    let f = fixture();
    let engine = f.engine();
    assert!(matches!(
        engine.semantic_search("   ", 5).unwrap_err(),
        EnvcatError::Query(QueryError::Empty)
    ));
    assert!(matches!(
        engine.semantic_search("soil", 0).unwrap_err(),
        EnvcatError::Query(QueryError::TopKOutOfRange { .. })
    ));
    let inverted = SearchFilters {
        date_from: NaiveDate::from_ymd_opt(2022, 1, 1),
        date_to: NaiveDate::from_ymd_opt(2020, 1, 1),
        ..Default::default()
    };
    assert!(matches!(
        engine.hybrid_search("soil", &inverted, 5).unwrap_err(),
        EnvcatError::Query(QueryError::InvalidDateRange { .. })
    ));
}

/// An unloaded context fails loudly instead of returning nothing.
#[test]
fn unloaded_context_is_unavailable() {
    let f = fixture();
    let context = RetrievalContext::new(f.config.retrieval.clone());
    let engine = RetrievalEngine::new(&context, &f.store);
    let err = engine.semantic_search("soil", 5).unwrap_err();
    assert!(err.is_unavailable());
    assert!(matches!(err, EnvcatError::Index(IndexError::NotLoaded { .. })));
}

/// Loading with a different model than the index was built with fails.
#[test]
fn model_mismatch_is_refused() {
    let f = fixture();
    let mut context = RetrievalContext::new(f.config.retrieval.clone());
    let err = context
        .load(
            std::path::Path::new(&f.config.embedding.index_dir),
            Box::new(HashedTfIdfProvider::new(DIMS / 2)),
        )
        .unwrap_err();
    assert!(matches!(err, EnvcatError::Index(IndexError::ModelMismatch { .. })));
    assert!(matches!(context.state(), ContextState::Failed(_)));
}
