//! Property tests for hybrid search against semantic search.

use std::sync::OnceLock;

use chrono::NaiveDate;
use envcat_core::config::EnvcatConfig;
use envcat_core::models::SearchFilters;
use envcat_core::traits::IRecordStore;
use envcat_embeddings::{EmbeddingGenerator, HashedTfIdfProvider};
use envcat_retrieval::{RetrievalContext, RetrievalEngine};
use envcat_storage::SqliteRecordStore;
use proptest::prelude::*;
use tempfile::TempDir;
use test_fixtures::sample_catalogue;

struct Fixture {
    _dir: TempDir,
    store: SqliteRecordStore,
    context: RetrievalContext,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EnvcatConfig::default();
        config.embedding.index_dir = dir.path().display().to_string();
        config.embedding.dimensions = 128;

        let store = SqliteRecordStore::open_in_memory().unwrap();
        for record in sample_catalogue() {
            store.add(&record).unwrap();
        }
        EmbeddingGenerator::new(config.embedding.clone())
            .generate_all(&store, &HashedTfIdfProvider::new(128))
            .unwrap();
        let context =
            RetrievalContext::open(&config, Box::new(HashedTfIdfProvider::new(128))).unwrap();
        Fixture {
            _dir: dir,
            store,
            context,
        }
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "soil carbon",
        "river flow",
        "upland peat",
        "gauging stations wales",
        "blanket bog carbon stock",
    ])
    .prop_map(str::to_string)
}

fn filters_strategy() -> impl Strategy<Value = SearchFilters> {
    let keyword = prop::option::of(prop::sample::select(vec![
        "Soil organic carbon",
        "Hydrology",
        "Wales",
        "Peatland",
        "absent keyword",
    ]));
    let from = prop::option::of(2015i32..2025);
    let to = prop::option::of(2015i32..2025);
    (keyword, from, to).prop_map(|(keyword, from, to)| SearchFilters {
        keywords: keyword.map(|k| vec![k.to_string()]).unwrap_or_default(),
        date_from: from.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        date_to: to
            .filter(|t| from.map_or(true, |f| *t >= f))
            .and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31)),
        ..Default::default()
    })
}

proptest! {
    /// Hybrid results are a subsequence of the over-fetched semantic results.
    #[test]
    fn hybrid_is_subsequence_of_semantic(
        query in query_strategy(),
        filters in filters_strategy(),
        k in 1usize..=33,
    ) {
        let f = fixture();
        let engine = RetrievalEngine::new(&f.context, &f.store);
        let hybrid = engine.hybrid_search(&query, &filters, k).unwrap();
        let semantic = engine.semantic_search(&query, k * 3).unwrap();

        prop_assert!(hybrid.len() <= k);
        let mut cursor = semantic.iter();
        for h in &hybrid {
            prop_assert!(
                cursor.any(|s| s.record_id == h.record_id),
                "{} out of order or missing", h.source_id
            );
        }
        for (i, h) in hybrid.iter().enumerate() {
            prop_assert_eq!(h.rank, i + 1);
        }
    }

    /// Every hybrid result satisfies the keyword filter.
    #[test]
    fn hybrid_results_satisfy_filters(
        query in query_strategy(),
        filters in filters_strategy(),
    ) {
        let f = fixture();
        let engine = RetrievalEngine::new(&f.context, &f.store);
        for r in engine.hybrid_search(&query, &filters, 10).unwrap() {
            let record = f.store.get(&r.source_id).unwrap().unwrap();
            for k in &filters.keywords {
                prop_assert!(record.has_keyword(k));
            }
        }
    }
}
