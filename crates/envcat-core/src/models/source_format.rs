use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four wire formats the catalogue publishes for every dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// ISO 19115 / Gemini XML.
    Xml,
    /// Catalogue-native JSON.
    Json,
    /// Schema.org JSON-LD.
    JsonLd,
    /// RDF Turtle (DCAT).
    Rdf,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 4] = [Self::Xml, Self::Json, Self::JsonLd, Self::Rdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::JsonLd => "jsonld",
            Self::Rdf => "rdf",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            "jsonld" | "json-ld" | "schema.org" => Ok(Self::JsonLd),
            "rdf" | "ttl" | "turtle" => Ok(Self::Rdf),
            other => Err(format!("unknown source format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_from_str() {
        for format in SourceFormat::ALL {
            assert_eq!(format.as_str().parse::<SourceFormat>().unwrap(), format);
        }
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!("ttl".parse::<SourceFormat>().unwrap(), SourceFormat::Rdf);
        assert_eq!("JSON-LD".parse::<SourceFormat>().unwrap(), SourceFormat::JsonLd);
        assert!("yaml".parse::<SourceFormat>().is_err());
    }
}
