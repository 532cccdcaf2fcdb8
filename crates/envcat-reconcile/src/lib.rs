//! # envcat-reconcile
//!
//! Turns one natural key into one `UnifiedRecord`:
//!
//! ```text
//!  natural key ─┬─▶ xml    ─┐
//!               ├─▶ json   ─┤  (concurrent, failures skipped)
//!               ├─▶ jsonld ─┼─▶ SourceSet ─▶ merge ─▶ UnifiedRecord
//!               └─▶ rdf    ─┘
//! ```
//!
//! `BatchIngestor` runs this over many keys and persists each result.

pub mod batch;
pub mod engine;
pub mod merge;

pub use batch::{read_identifier_file, BatchIngestor};
pub use engine::ReconciliationEngine;
pub use merge::{coalesce, merge, merge_contacts, merge_keywords, SourceSet};
