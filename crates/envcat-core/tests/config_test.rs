//! Config loading: defaults, partial TOML, validation failures.

use envcat_core::config::defaults;
use envcat_core::{EnvcatConfig, EnvcatError};

#[test]
fn empty_toml_yields_defaults() {
    let cfg = EnvcatConfig::from_toml_str("").unwrap();
    assert_eq!(cfg.embedding.model_name, defaults::DEFAULT_EMBEDDING_MODEL);
    assert_eq!(cfg.embedding.dimensions, 384);
    assert_eq!(cfg.retrieval.default_top_k, 10);
    assert_eq!(cfg.retrieval.over_fetch_factor, 3);
    assert_eq!(cfg.extraction.max_retries, 3);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let cfg = EnvcatConfig::from_toml_str(
        r#"
        [embedding]
        dimensions = 64
        include_lineage = true
        "#,
    )
    .unwrap();
    assert_eq!(cfg.embedding.dimensions, 64);
    assert!(cfg.embedding.include_lineage);
    assert_eq!(cfg.embedding.batch_size, defaults::DEFAULT_EMBEDDING_BATCH_SIZE);
}

#[test]
fn zero_retries_is_rejected() {
    let err = EnvcatConfig::from_toml_str("[extraction]\nmax_retries = 0").unwrap_err();
    assert!(matches!(err, EnvcatError::Config(_)), "got {err:?}");
}

#[test]
fn max_top_k_above_hundred_is_rejected() {
    assert!(EnvcatConfig::from_toml_str("[retrieval]\nmax_top_k = 101").is_err());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = EnvcatConfig::from_toml_str("[embedding\n").unwrap_err();
    assert!(err.to_string().contains("cannot parse config"));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("envcat.toml");
    std::fs::write(&path, "[storage]\ndb_path = \"/tmp/x.db\"\n").unwrap();
    let cfg = EnvcatConfig::load(&path).unwrap();
    assert_eq!(cfg.storage.db_path, "/tmp/x.db");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = EnvcatConfig::load(std::path::Path::new("/nonexistent/envcat.toml")).unwrap_err();
    assert!(err.to_string().contains("cannot read config"));
}
