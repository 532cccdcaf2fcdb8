use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Contact, Keyword, OnlineResource, RawSourceDocument, Relationship, SpatialExtent,
    TemporalExtent,
};

/// A dataset's reconciled metadata. Only the reconciliation engine builds
/// these; every ingestion produces a complete replacement candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    /// Surrogate key (UUID v4).
    pub id: String,
    /// Natural key. Never empty, unique across the collection.
    pub source_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub description: Option<String>,
    pub lineage: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub metadata_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDate>,
    pub metadata_standard: Option<String>,
    pub metadata_standard_version: Option<String>,
    pub language: Option<String>,
    pub resource_status: Option<String>,
    pub resource_type: Option<String>,
    /// Formatted citation.
    pub credit_text: Option<String>,
    pub is_accessible_for_free: Option<bool>,
    pub licence: Option<String>,
    /// Format-specific extras that have no dedicated field.
    #[serde(default)]
    pub extensions: BTreeMap<String, serde_json::Value>,
    pub spatial_extent: Option<SpatialExtent>,
    pub temporal_extent: Option<TemporalExtent>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub online_resources: Vec<OnlineResource>,
    #[serde(default)]
    pub raw_documents: Vec<RawSourceDocument>,
    pub ingested_at: DateTime<Utc>,
}

impl UnifiedRecord {
    /// Empty record carrying only identity and title.
    pub fn new(id: impl Into<String>, source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            title: title.into(),
            abstract_text: None,
            description: None,
            lineage: None,
            publication_date: None,
            metadata_date: None,
            updated_date: None,
            metadata_standard: None,
            metadata_standard_version: None,
            language: None,
            resource_status: None,
            resource_type: None,
            credit_text: None,
            is_accessible_for_free: None,
            licence: None,
            extensions: BTreeMap::new(),
            spatial_extent: None,
            temporal_extent: None,
            contacts: Vec::new(),
            keywords: Vec::new(),
            relationships: Vec::new(),
            online_resources: Vec::new(),
            raw_documents: Vec::new(),
            ingested_at: Utc::now(),
        }
    }

    /// Case-insensitive exact keyword test.
    pub fn has_keyword(&self, text: &str) -> bool {
        let wanted = text.trim().to_lowercase();
        self.keywords.iter().any(|k| k.folded() == wanted)
    }

    /// Abstract cut to at most `max_chars` characters.
    pub fn abstract_preview(&self, max_chars: usize) -> Option<String> {
        self.abstract_text
            .as_deref()
            .map(|a| a.chars().take(max_chars).collect())
    }
}
