use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::{
    Contact, Keyword, OnlineResource, Relationship, SourceFormat, SpatialExtent, TemporalExtent,
};

/// Fixed-shape extraction result. Every parser fills the same struct; fields
/// a format cannot express stay `None` or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredFields {
    pub format: SourceFormat,
    pub identifier: Option<String>,
    pub title: Option<String>,
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
    pub credit_text: Option<String>,
    pub is_accessible_for_free: Option<bool>,
    pub licence: Option<String>,
    pub spatial_extent: Option<SpatialExtent>,
    pub temporal_extent: Option<TemporalExtent>,
    pub contacts: Vec<Contact>,
    pub keywords: Vec<Keyword>,
    pub relationships: Vec<Relationship>,
    pub online_resources: Vec<OnlineResource>,
    pub extensions: BTreeMap<String, serde_json::Value>,
    /// Untouched payload, decoded as UTF-8 (lossy).
    pub raw_payload: String,
    pub raw_size: usize,
}

impl StructuredFields {
    pub fn new(format: SourceFormat, raw: &[u8]) -> Self {
        Self {
            format,
            identifier: None,
            title: None,
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
            spatial_extent: None,
            temporal_extent: None,
            contacts: Vec::new(),
            keywords: Vec::new(),
            relationships: Vec::new(),
            online_resources: Vec::new(),
            extensions: BTreeMap::new(),
            raw_payload: String::from_utf8_lossy(raw).into_owned(),
            raw_size: raw.len(),
        }
    }

    /// Title with surrounding whitespace removed, `None` if blank.
    pub fn non_blank_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
