/// Catalogue system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard upper bound on `top_k` for any retrieval call.
pub const MAX_TOP_K: usize = 100;

/// Hard upper bound on query length, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// Separator placed between synthesized text fields.
pub const TEXT_FIELD_SEPARATOR: &str = ". ";

/// Batch progress is logged every this many datasets.
pub const BATCH_PROGRESS_INTERVAL: usize = 10;

/// Valid longitude range, inclusive.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Valid latitude range, inclusive. Out-of-range latitudes are clamped.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Index artifact file names. All three are written and loaded as a unit.
pub const INDEX_FILE_NAME: &str = "similarity.index";
pub const SLOT_MAPPING_FILE_NAME: &str = "slot_mapping.json";
pub const METADATA_SNAPSHOT_FILE_NAME: &str = "metadata_snapshot.json";

/// Magic bytes at the head of the similarity index file.
pub const INDEX_MAGIC: &[u8; 4] = b"ECIX";

/// Binary layout version of the similarity index file.
pub const INDEX_FORMAT_VERSION: u32 = 1;
