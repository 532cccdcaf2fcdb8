//! # envcat-extract
//!
//! One extractor per catalogue wire format, all behind the same
//! fetch → parse → validate orchestration.
//!
//! ## Architecture
//!
//! ```text
//! SourceExtractor { format, parse }
//! ├── validate location
//! ├── ISourceFetcher::fetch (HttpFetcher: bounded retry + backoff)
//! ├── parse callback
//! │   ├── iso_xml      (quick-xml → element tree)
//! │   ├── ceh_json     (serde_json)
//! │   ├── schema_org   (serde_json, @graph resolution)
//! │   └── dcat_turtle  (oxttl → triples)
//! └── structural validation
//! ```

pub mod dates;
pub mod extractor;
pub mod fetcher;
pub mod parsers;

pub use extractor::SourceExtractor;
pub use fetcher::HttpFetcher;
