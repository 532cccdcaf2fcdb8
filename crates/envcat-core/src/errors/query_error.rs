/// Malformed queries, rejected before the index is touched.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("query is {length} characters, maximum is {max}")]
    TooLong { length: usize, max: usize },

    #[error("top_k {top_k} out of range 1..={max}")]
    TopKOutOfRange { top_k: usize, max: usize },

    #[error("date_from {from} is after date_to {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("invalid spatial bounds: {reason}")]
    InvalidBounds { reason: String },
}
