//! Exact similarity index and its persisted artifacts.

mod artifacts;
mod flat_index;

pub use artifacts::{IndexArtifacts, MetadataSnapshot, SlotEntry, SlotMapping, SnapshotEntry};
pub use flat_index::FlatIndex;
