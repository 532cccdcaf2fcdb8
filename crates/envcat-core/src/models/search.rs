use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{SpatialExtent, UnifiedRecord};

/// Structured predicates for hybrid search. Every set predicate must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Every listed keyword must be present (case-insensitive exact match).
    #[serde(default)]
    pub keywords: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub spatial_bounds: Option<SpatialExtent>,
    /// At least one listed name must match a contact's name.
    #[serde(default)]
    pub authors: Vec<String>,
    /// At least one listed name must match a contact's organisation.
    #[serde(default)]
    pub organisations: Vec<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.spatial_bounds.is_none()
            && self.authors.is_empty()
            && self.organisations.is_empty()
    }
}

/// One entry of a ranked result list. Rank 1 is the most similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,
    pub record_id: String,
    pub source_id: String,
    pub title: String,
    pub abstract_preview: Option<String>,
    /// Raw inner product against the query.
    pub similarity: f32,
    /// Similarity mapped monotonically into [0, 1].
    pub relevance: f32,
    /// Full store record. `None` when the store no longer holds it.
    pub record: Option<UnifiedRecord>,
}
