use crate::errors::EnvcatResult;
use crate::models::SourceFormat;

/// Retrieves raw source payloads. The HTTP implementation lives in
/// `envcat-extract`; tests substitute an in-memory one.
pub trait ISourceFetcher: Send + Sync {
    /// Fetch the bytes at `location`. Implementations own their retry policy
    /// and report failures as `ExtractionError::FetchFailed` tagged with
    /// `format`.
    fn fetch(&self, format: SourceFormat, location: &str) -> EnvcatResult<Vec<u8>>;
}
