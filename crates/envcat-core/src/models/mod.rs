mod batch_summary;
mod contact;
mod embedding_record;
mod extent;
mod keyword;
mod link;
mod predicate;
mod raw_document;
mod record;
mod search;
mod source_format;
mod structured_fields;

pub use batch_summary::BatchSummary;
pub use contact::Contact;
pub use embedding_record::EmbeddingRecord;
pub use extent::{SpatialExtent, TemporalExtent};
pub use keyword::{Keyword, KeywordType};
pub use link::{OnlineResource, Relationship};
pub use predicate::RecordPredicate;
pub use raw_document::RawSourceDocument;
pub use record::UnifiedRecord;
pub use search::{RankedResult, SearchFilters};
pub use source_format::SourceFormat;
pub use structured_fields::StructuredFields;
