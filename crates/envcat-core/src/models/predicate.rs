use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Simple store-side predicate. All set fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPredicate {
    /// Exact keyword text, case-insensitive.
    pub keyword: Option<String>,
    pub published_from: Option<NaiveDate>,
    pub published_to: Option<NaiveDate>,
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
    pub limit: Option<usize>,
}

impl RecordPredicate {
    pub fn keyword(text: impl Into<String>) -> Self {
        Self {
            keyword: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn published_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            published_from: from,
            published_to: to,
            ..Default::default()
        }
    }
}
