use serde::{Deserialize, Serialize};

/// Typed edge to another dataset. The target is a natural key: it may not
/// have been ingested yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub relation_type: String,
    pub target_source_id: String,
}

/// Download, service, or information link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineResource {
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// `download`, `information`, `order`, ...
    pub function: Option<String>,
    pub resource_type: Option<String>,
}
