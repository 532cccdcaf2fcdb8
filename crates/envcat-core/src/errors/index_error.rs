/// Similarity index and retrieval-context errors. Any of these means the
/// retrieval side must refuse to serve rather than answer with nothing.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index artifact missing: {path}")]
    ArtifactMissing { path: String },

    #[error("index artifact corrupt: {path}: {reason}")]
    ArtifactCorrupt { path: String, reason: String },

    #[error("index artifacts do not belong together: {reason}")]
    ArtifactMismatch { reason: String },

    #[error(
        "index was built with {index_model} ({index_dims} dims) but the loaded model is {model} ({dims} dims)"
    )]
    ModelMismatch {
        index_model: String,
        index_dims: usize,
        model: String,
        dims: usize,
    },

    #[error("index I/O failed at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("retrieval context is not ready (state: {state})")]
    NotLoaded { state: String },

    #[error("cannot build an index over an empty record set")]
    EmptyCollection,
}
