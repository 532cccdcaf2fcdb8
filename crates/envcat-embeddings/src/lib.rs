//! # envcat-embeddings
//!
//! Offline index build over the full record set.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddingGenerator
//! ├── synthesis (title. abstract. [lineage])
//! ├── IEmbeddingProvider (exactly one per build)
//! │   ├── HashedTfIdfProvider (offline, deterministic)
//! │   ├── OnnxProvider (local model)
//! │   └── ApiProvider (OpenAI-compatible endpoint)
//! ├── normalize (unit L2 norm, dimension check)
//! └── index
//!     ├── FlatIndex (exact inner product)
//!     └── artifacts (similarity.index, slot_mapping.json, metadata_snapshot.json)
//! ```
//!
//! `EmbeddingCache` is the query-side moka cache used by retrieval.

pub mod cache;
pub mod generator;
pub mod index;
pub mod normalize;
pub mod providers;
pub mod synthesis;

pub use cache::EmbeddingCache;
pub use generator::{EmbeddingGenerator, GenerationReport};
pub use index::{FlatIndex, IndexArtifacts, MetadataSnapshot, SlotMapping};
pub use providers::{create_provider, ApiProvider, HashedTfIdfProvider, OnnxProvider};
pub use synthesis::synthesize;
