//! Structured predicates for hybrid search. All set predicates must hold.

use envcat_core::models::SearchFilters;
use envcat_core::UnifiedRecord;

/// True when `record` satisfies every predicate in `filters`.
///
/// A record lacking the attribute a predicate tests (no publication date,
/// no extent, no contacts) fails that predicate.
pub fn matches(record: &UnifiedRecord, filters: &SearchFilters) -> bool {
    keywords_match(record, &filters.keywords)
        && date_matches(record, filters)
        && spatial_matches(record, filters)
        && authors_match(record, &filters.authors)
        && organisations_match(record, &filters.organisations)
}

fn keywords_match(record: &UnifiedRecord, keywords: &[String]) -> bool {
    keywords.iter().all(|k| record.has_keyword(k))
}

fn date_matches(record: &UnifiedRecord, filters: &SearchFilters) -> bool {
    if filters.date_from.is_none() && filters.date_to.is_none() {
        return true;
    }
    record.publication_date.is_some_and(|d| {
        filters.date_from.map_or(true, |from| d >= from) && filters.date_to.map_or(true, |to| d <= to)
    })
}

fn spatial_matches(record: &UnifiedRecord, filters: &SearchFilters) -> bool {
    match filters.spatial_bounds {
        None => true,
        Some(bounds) => record
            .spatial_extent
            .is_some_and(|extent| extent.intersects(&bounds)),
    }
}

fn authors_match(record: &UnifiedRecord, authors: &[String]) -> bool {
    authors.is_empty()
        || authors
            .iter()
            .any(|a| record.contacts.iter().any(|c| c.matches_author(a)))
}

fn organisations_match(record: &UnifiedRecord, organisations: &[String]) -> bool {
    organisations.is_empty()
        || organisations
            .iter()
            .any(|o| record.contacts.iter().any(|c| c.matches_organisation(o)))
}
