//! Query and filter checks, run before the index is touched.

use envcat_core::config::RetrievalConfig;
use envcat_core::errors::{EnvcatResult, QueryError};
use envcat_core::models::SearchFilters;

/// Returns the trimmed query.
pub fn validate_query<'q>(query: &'q str, top_k: usize, config: &RetrievalConfig) -> EnvcatResult<&'q str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(QueryError::Empty.into());
    }
    let length = trimmed.chars().count();
    if length > config.max_query_chars {
        return Err(QueryError::TooLong {
            length,
            max: config.max_query_chars,
        }
        .into());
    }
    if top_k == 0 || top_k > config.max_top_k {
        return Err(QueryError::TopKOutOfRange {
            top_k,
            max: config.max_top_k,
        }
        .into());
    }
    Ok(trimmed)
}

pub fn validate_filters(filters: &SearchFilters) -> EnvcatResult<()> {
    if let (Some(from), Some(to)) = (filters.date_from, filters.date_to) {
        if from > to {
            return Err(QueryError::InvalidDateRange {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }
    }
    if let Some(bounds) = filters.spatial_bounds {
        if bounds.validated().is_none() {
            return Err(QueryError::InvalidBounds {
                reason: format!(
                    "longitudes must lie in [-180, 180] and all values be finite, got {bounds:?}"
                ),
            }
            .into());
        }
        if bounds.south > bounds.north {
            return Err(QueryError::InvalidBounds {
                reason: format!("south {} is north of {}", bounds.south, bounds.north),
            }
            .into());
        }
    }
    Ok(())
}
