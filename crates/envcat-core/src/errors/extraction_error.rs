use crate::models::SourceFormat;

/// Per-format extraction failures. Always recoverable at the dataset level:
/// the format is treated as unavailable and reconciliation continues.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("[{format}] invalid source location: {location:?}")]
    InvalidLocation { format: SourceFormat, location: String },

    #[error("[{format}] fetch failed for {location} after {attempts} attempt(s): {reason}")]
    FetchFailed {
        format: SourceFormat,
        location: String,
        attempts: u32,
        reason: String,
    },

    #[error("[{format}] parse failed: {reason}")]
    ParseFailed { format: SourceFormat, reason: String },

    #[error("[{format}] validation failed: {reason}")]
    ValidationFailed { format: SourceFormat, reason: String },
}

impl ExtractionError {
    /// The format tag the failure belongs to.
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::InvalidLocation { format, .. }
            | Self::FetchFailed { format, .. }
            | Self::ParseFailed { format, .. }
            | Self::ValidationFailed { format, .. } => *format,
        }
    }

    pub fn parse(format: SourceFormat, reason: impl Into<String>) -> Self {
        Self::ParseFailed {
            format,
            reason: reason.into(),
        }
    }
}
