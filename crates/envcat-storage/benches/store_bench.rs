use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

use envcat_core::config::StorageConfig;
use envcat_core::models::{Keyword, KeywordType, RecordPredicate};
use envcat_core::traits::IRecordStore;
use envcat_core::UnifiedRecord;
use envcat_storage::SqliteRecordStore;

fn make_records(n: usize) -> Vec<UnifiedRecord> {
    (0..n)
        .map(|i| {
            let mut r = UnifiedRecord::new(format!("rec-{i}"), format!("ds-{i:05}"), format!("Dataset {i}"));
            r.abstract_text = Some(format!("Synthetic abstract number {i} about soils and rivers."));
            r.keywords = vec![
                Keyword::new(if i % 2 == 0 { "Soil" } else { "Hydrology" }, KeywordType::Theme),
                Keyword::new("Great Britain", KeywordType::Place),
            ];
            r
        })
        .collect()
}

fn bench_insert_100(c: &mut Criterion) {
    let records = make_records(100);
    c.bench_function("insert_100_records", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let store = SqliteRecordStore::open_path(&dir.path().join("b.db"), &StorageConfig::default())
                    .unwrap();
                (dir, store)
            },
            |(_dir, store)| {
                for r in &records {
                    store.add(r).unwrap();
                }
            },
            BatchSize::PerIteration,
        )
    });
}

fn bench_keyword_query(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store =
        SqliteRecordStore::open_path(&dir.path().join("b.db"), &StorageConfig::default()).unwrap();
    for r in make_records(1_000) {
        store.add(&r).unwrap();
    }
    let predicate = RecordPredicate::keyword("soil");

    c.bench_function("keyword_query_1k", |b| {
        b.iter(|| store.query_by_predicate(&predicate).unwrap())
    });
}

criterion_group!(benches, bench_insert_100, bench_keyword_query);
criterion_main!(benches);
