mod embedding;
mod fetcher;
mod record_store;

pub use embedding::IEmbeddingProvider;
pub use fetcher::ISourceFetcher;
pub use record_store::IRecordStore;
