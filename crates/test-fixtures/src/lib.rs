//! Test fixture loader for catalogue source payloads.
//!
//! `sources/` holds one file per dataset and format, named
//! `<natural-key>.<ext>`. Datasets are not required to exist in every
//! format; a missing file behaves like a catalogue 404.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use envcat_core::config::ExtractionConfig;
use envcat_core::errors::{EnvcatResult, ExtractionError};
use envcat_core::traits::ISourceFetcher;
use envcat_core::SourceFormat;

mod memory_store;
mod records;

pub use memory_store::MemoryRecordStore;
pub use records::{sample_catalogue, sample_record};

/// Soil carbon survey. Present in all four formats with deliberately
/// conflicting titles and overlapping contacts/keywords.
pub const SOIL_CARBON_ID: &str = "be0bdc0e-bc2e-4f1d-b524-2c02798dd893";
/// River flow record. Present in all four formats.
pub const RIVER_FLOW_ID: &str = "8d3a1f02-5c7e-4b11-9e7a-0f3c2d1e4b55";
/// Peat carbon record. JSON and XML only.
pub const PEAT_CARBON_ID: &str = "f4c7d9a0-21e3-4b8f-a6d2-93e1b0c5d7e8";

pub const ALL_DATASET_IDS: [&str; 3] = [SOIL_CARBON_ID, RIVER_FLOW_ID, PEAT_CARBON_ID];

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// File extension used on disk for a format.
pub fn extension(format: SourceFormat) -> &'static str {
    match format {
        SourceFormat::Xml => "xml",
        SourceFormat::Json => "json",
        SourceFormat::JsonLd => "jsonld",
        SourceFormat::Rdf => "ttl",
    }
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Path of the payload for one dataset and format.
pub fn source_path(natural_key: &str, format: SourceFormat) -> PathBuf {
    fixture_path(&format!("sources/{natural_key}.{}", extension(format)))
}

/// Whether a payload exists for this dataset and format.
pub fn has_source(natural_key: &str, format: SourceFormat) -> bool {
    source_path(natural_key, format).exists()
}

/// Load a payload as raw bytes.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_source(natural_key: &str, format: SourceFormat) -> Vec<u8> {
    let path = source_path(natural_key, format);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load a JSON-shaped payload as a `serde_json::Value`.
pub fn load_source_value(natural_key: &str, format: SourceFormat) -> serde_json::Value {
    let bytes = load_source(natural_key, format);
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!("Failed to parse fixture {natural_key}.{}: {e}", extension(format))
    })
}

/// Path of the sample identifier list.
pub fn catalogue_list_path() -> PathBuf {
    fixture_path("sources/catalogue.txt")
}

/// In-memory fetcher serving fixture payloads at the locations an
/// `ExtractionConfig` would produce.
pub struct FixtureFetcher {
    payloads: HashMap<String, Vec<u8>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl FixtureFetcher {
    /// Serve every fixture dataset in every format it exists in.
    pub fn new(config: &ExtractionConfig) -> Self {
        let mut payloads = HashMap::new();
        for id in ALL_DATASET_IDS {
            for format in SourceFormat::ALL {
                if has_source(id, format) {
                    payloads.insert(config.location_for(format, id), load_source(id, format));
                }
            }
        }
        Self::from_payloads(payloads)
    }

    /// Serve exactly the given location → payload pairs.
    pub fn from_payloads(payloads: HashMap<String, Vec<u8>>) -> Self {
        Self {
            payloads,
            failing: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Add or replace one payload.
    pub fn with_payload(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.payloads.insert(location.into(), bytes.into());
        self
    }

    /// Make `location` fail as if the network were down.
    pub fn fail(&self, location: impl Into<String>) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(location.into());
        }
    }

    /// Number of fetches served or refused so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISourceFetcher for FixtureFetcher {
    fn fetch(&self, format: SourceFormat, location: &str) -> EnvcatResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let refused = self
            .failing
            .lock()
            .map(|f| f.contains(location))
            .unwrap_or(false);
        if refused {
            return Err(fetch_failure(format, location, "connection refused"));
        }
        self.payloads
            .get(location)
            .cloned()
            .ok_or_else(|| fetch_failure(format, location, "HTTP 404 Not Found"))
    }
}

fn fetch_failure(format: SourceFormat, location: &str, reason: &str) -> envcat_core::EnvcatError {
    ExtractionError::FetchFailed {
        format,
        location: location.to_string(),
        attempts: 1,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dataset_has_json_and_xml() {
        for id in ALL_DATASET_IDS {
            assert!(has_source(id, SourceFormat::Json), "missing json for {id}");
            assert!(has_source(id, SourceFormat::Xml), "missing xml for {id}");
        }
    }

    #[test]
    fn peat_record_lacks_linked_data_formats() {
        assert!(!has_source(PEAT_CARBON_ID, SourceFormat::JsonLd));
        assert!(!has_source(PEAT_CARBON_ID, SourceFormat::Rdf));
    }

    #[test]
    fn json_fixtures_parse() {
        for id in ALL_DATASET_IDS {
            let v = load_source_value(id, SourceFormat::Json);
            assert_eq!(v["id"], id);
        }
    }

    #[test]
    fn fetcher_serves_configured_locations() {
        let cfg = ExtractionConfig::default();
        let fetcher = FixtureFetcher::new(&cfg);
        let loc = cfg.location_for(SourceFormat::Xml, SOIL_CARBON_ID);
        assert!(!fetcher.fetch(SourceFormat::Xml, &loc).unwrap().is_empty());
        fetcher.fail(loc.clone());
        assert!(fetcher.fetch(SourceFormat::Xml, &loc).is_err());
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn missing_format_is_not_found() {
        let cfg = ExtractionConfig::default();
        let fetcher = FixtureFetcher::new(&cfg);
        let loc = cfg.location_for(SourceFormat::Rdf, PEAT_CARBON_ID);
        let err = fetcher.fetch(SourceFormat::Rdf, &loc).unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
