//! # envcat-retrieval
//!
//! Query side of the catalogue. A [`RetrievalContext`] is loaded once at
//! startup (index artifacts + embedding provider) and then shared by every
//! query; [`RetrievalEngine`] runs semantic and hybrid search against it.
//!
//! ```text
//! query ──validate──► embed (cached) ──► FlatIndex top-k ──► store lookup ──► ranked
//!                                            │
//! hybrid: top k × over-fetch ───────────────►└──► AND filters ──► renumber ──► top k
//! ```

pub mod context;
pub mod engine;
pub mod filters;
pub mod validation;

pub use context::{ContextState, RetrievalContext};
pub use engine::RetrievalEngine;
