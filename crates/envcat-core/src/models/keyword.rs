use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keyword vocabulary class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordType {
    Theme,
    Place,
    Project,
    Other,
}

impl KeywordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Place => "place",
            Self::Project => "project",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for KeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "theme" => Ok(Self::Theme),
            "place" => Ok(Self::Place),
            "project" => Ok(Self::Project),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown keyword type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub keyword_type: KeywordType,
    /// Ontology URI for the term, when a source provides one.
    pub uri: Option<String>,
    /// Vocabulary the term belongs to.
    pub defined_term_set: Option<String>,
}

impl Keyword {
    pub fn new(text: impl Into<String>, keyword_type: KeywordType) -> Self {
        Self {
            text: text.into(),
            keyword_type,
            uri: None,
            defined_term_set: None,
        }
    }

    pub fn with_uri(mut self, uri: Option<String>) -> Self {
        self.uri = uri;
        self
    }

    /// Case-folded text, used for equality across sources.
    pub fn folded(&self) -> String {
        self.text.trim().to_lowercase()
    }
}
