//! The single extraction workflow, parameterized by a per-format parse
//! callback.

use envcat_core::errors::{EnvcatError, EnvcatResult, ExtractionError};
use envcat_core::traits::ISourceFetcher;
use envcat_core::{SourceFormat, StructuredFields};
use tracing::{debug, warn};

use crate::parsers;

/// Format-specific parse step.
pub type ParseFn = fn(&[u8]) -> Result<StructuredFields, ExtractionError>;

/// One extractor: a format tag plus its parse callback.
#[derive(Clone, Copy)]
pub struct SourceExtractor {
    format: SourceFormat,
    parse: ParseFn,
}

impl std::fmt::Debug for SourceExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceExtractor")
            .field("format", &self.format)
            .finish()
    }
}

impl SourceExtractor {
    pub fn new(format: SourceFormat, parse: ParseFn) -> Self {
        Self { format, parse }
    }

    /// The built-in extractor for a format.
    pub fn for_format(format: SourceFormat) -> Self {
        let parse: ParseFn = match format {
            SourceFormat::Xml => parsers::iso_xml::parse,
            SourceFormat::Json => parsers::ceh_json::parse,
            SourceFormat::JsonLd => parsers::schema_org::parse,
            SourceFormat::Rdf => parsers::dcat_turtle::parse,
        };
        Self::new(format, parse)
    }

    /// All four built-in extractors.
    pub fn all() -> Vec<Self> {
        SourceFormat::ALL.into_iter().map(Self::for_format).collect()
    }

    pub fn source_type(&self) -> SourceFormat {
        self.format
    }

    /// validate location → fetch → parse → validate fields.
    ///
    /// Every failure comes back as an `ExtractionError` tagged with this
    /// extractor's format.
    pub fn extract(
        &self,
        fetcher: &dyn ISourceFetcher,
        location: &str,
    ) -> EnvcatResult<StructuredFields> {
        self.validate_location(location)?;

        let raw = fetcher
            .fetch(self.format, location)
            .map_err(|e| self.retag_fetch_error(location, e))?;
        debug!(format = %self.format, location, bytes = raw.len(), "fetched source");

        let fields = (self.parse)(&raw).map_err(|e| {
            warn!(format = %self.format, location, error = %e, "source parse failed");
            e
        })?;
        self.validate_fields(&fields)?;
        Ok(fields)
    }

    /// Parse an already-fetched payload and validate it.
    pub fn parse_bytes(&self, raw: &[u8]) -> EnvcatResult<StructuredFields> {
        let fields = (self.parse)(raw)?;
        self.validate_fields(&fields)?;
        Ok(fields)
    }

    fn validate_location(&self, location: &str) -> Result<(), ExtractionError> {
        let trimmed = location.trim();
        let ok = !trimmed.is_empty()
            && (trimmed.starts_with("http://") || trimmed.starts_with("https://"));
        if ok {
            Ok(())
        } else {
            Err(ExtractionError::InvalidLocation {
                format: self.format,
                location: location.to_string(),
            })
        }
    }

    fn validate_fields(&self, fields: &StructuredFields) -> Result<(), ExtractionError> {
        let invalid = |reason: &str| ExtractionError::ValidationFailed {
            format: self.format,
            reason: reason.to_string(),
        };
        if fields.raw_size == 0 {
            return Err(invalid("empty payload"));
        }
        if fields
            .identifier
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
        {
            return Err(invalid("identifier missing"));
        }
        if fields.non_blank_title().is_none() {
            return Err(invalid("title missing"));
        }
        Ok(())
    }

    /// Fetch failures always carry this extractor's format tag.
    fn retag_fetch_error(&self, location: &str, err: EnvcatError) -> EnvcatError {
        match err {
            EnvcatError::Extraction(ExtractionError::FetchFailed {
                attempts, reason, ..
            }) => ExtractionError::FetchFailed {
                format: self.format,
                location: location.to_string(),
                attempts,
                reason,
            }
            .into(),
            EnvcatError::Extraction(e) => e.into(),
            other => ExtractionError::FetchFailed {
                format: self.format,
                location: location.to_string(),
                attempts: 0,
                reason: other.to_string(),
            }
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static [u8]);

    impl ISourceFetcher for StaticFetcher {
        fn fetch(&self, _format: SourceFormat, _location: &str) -> EnvcatResult<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    #[test]
    fn rejects_non_http_location_before_fetching() {
        let ex = SourceExtractor::for_format(SourceFormat::Json);
        let err = ex
            .extract(&StaticFetcher(b"{}"), "ftp://example.org/x")
            .unwrap_err();
        assert!(matches!(
            err,
            EnvcatError::Extraction(ExtractionError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn empty_payload_fails_parse_or_validation() {
        let ex = SourceExtractor::for_format(SourceFormat::Json);
        let err = ex
            .extract(&StaticFetcher(b""), "https://example.org/x?format=json")
            .unwrap_err();
        match err {
            EnvcatError::Extraction(e) => assert_eq!(e.format(), SourceFormat::Json),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_title_fails_validation() {
        let ex = SourceExtractor::for_format(SourceFormat::Json);
        let err = ex
            .extract(
                &StaticFetcher(br#"{"id": "abc", "title": "   "}"#),
                "https://example.org/abc?format=json",
            )
            .unwrap_err();
        assert!(
            matches!(
                err,
                EnvcatError::Extraction(ExtractionError::ValidationFailed { .. })
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn minimal_json_passes() {
        let ex = SourceExtractor::for_format(SourceFormat::Json);
        let fields = ex
            .extract(
                &StaticFetcher(br#"{"id": "abc", "title": "Minimal"}"#),
                "https://example.org/abc?format=json",
            )
            .unwrap();
        assert_eq!(fields.identifier.as_deref(), Some("abc"));
        assert_eq!(ex.source_type(), SourceFormat::Json);
    }

    #[test]
    fn all_covers_every_format_once() {
        let formats: Vec<_> = SourceExtractor::all().iter().map(|e| e.source_type()).collect();
        assert_eq!(formats, SourceFormat::ALL.to_vec());
    }
}
