use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::SourceFormat;

/// Fetch and batch-ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Catalogue document root, substituted for `{base}` in the templates.
    pub base_url: String,
    pub xml_url_template: String,
    pub json_url_template: String,
    pub jsonld_url_template: String,
    pub rdf_url_template: String,
    pub request_timeout_secs: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// First backoff delay, doubled each retry.
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Datasets reconciled concurrently during batch ingestion.
    pub batch_workers: usize,
    /// Pause between datasets when `batch_workers == 1`.
    pub polite_delay_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_CATALOGUE_BASE_URL.to_string(),
            xml_url_template: defaults::DEFAULT_XML_URL_TEMPLATE.to_string(),
            json_url_template: defaults::DEFAULT_JSON_URL_TEMPLATE.to_string(),
            jsonld_url_template: defaults::DEFAULT_JSONLD_URL_TEMPLATE.to_string(),
            rdf_url_template: defaults::DEFAULT_RDF_URL_TEMPLATE.to_string(),
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            batch_workers: defaults::DEFAULT_BATCH_WORKERS,
            polite_delay_ms: defaults::DEFAULT_POLITE_DELAY_MS,
        }
    }
}

impl ExtractionConfig {
    /// Source location of `natural_key` in the given format.
    pub fn location_for(&self, format: SourceFormat, natural_key: &str) -> String {
        let template = match format {
            SourceFormat::Xml => &self.xml_url_template,
            SourceFormat::Json => &self.json_url_template,
            SourceFormat::JsonLd => &self.jsonld_url_template,
            SourceFormat::Rdf => &self.rdf_url_template,
        };
        template
            .replace("{base}", self.base_url.trim_end_matches('/'))
            .replace("{id}", natural_key)
    }
}
