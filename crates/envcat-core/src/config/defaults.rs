// Single source of truth for all default values.

// --- Extraction ---
pub const DEFAULT_CATALOGUE_BASE_URL: &str = "https://catalogue.ceh.ac.uk/documents";
pub const DEFAULT_XML_URL_TEMPLATE: &str = "{base}/{id}.xml";
pub const DEFAULT_JSON_URL_TEMPLATE: &str = "{base}/{id}?format=json";
pub const DEFAULT_JSONLD_URL_TEMPLATE: &str = "{base}/{id}?format=schema.org";
pub const DEFAULT_RDF_URL_TEMPLATE: &str = "{base}/{id}?format=ttl";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_BATCH_WORKERS: usize = 4;
pub const DEFAULT_POLITE_DELAY_MS: u64 = 500;

// --- Storage ---
pub const DEFAULT_DB_PATH: &str = "data/datasets.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashed";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 32;
pub const DEFAULT_INCLUDE_LINEAGE: bool = false;
pub const DEFAULT_INDEX_DIR: &str = "data/index";
pub const DEFAULT_API_KEY_ENV: &str = "ENVCAT_EMBEDDING_API_KEY";
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_OVER_FETCH_FACTOR: usize = 3;
pub const DEFAULT_QUERY_CACHE_SIZE: u64 = 1_000;

// --- Logging ---
pub const DEFAULT_LOG_FILTER: &str = "envcat=info";
pub const DEFAULT_LOG_JSON: bool = false;
