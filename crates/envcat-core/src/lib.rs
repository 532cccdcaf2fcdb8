//! # envcat-core
//!
//! Foundation crate for the environmental dataset catalogue.
//! Defines the unified record model, the per-format intermediate,
//! errors, config, traits, and constants. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EnvcatConfig;
pub use errors::{EnvcatError, EnvcatResult};
pub use models::{SourceFormat, StructuredFields, UnifiedRecord};
