/// Dataset-level reconciliation failures. The dataset is skipped and the
/// batch continues.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("all {attempted} source formats failed for {source_id}")]
    AllSourcesFailed { source_id: String, attempted: usize },

    #[error("merged title is empty for {source_id}")]
    EmptyTitle { source_id: String },
}
