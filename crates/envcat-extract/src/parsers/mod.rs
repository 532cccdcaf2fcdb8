//! Format-specific parse callbacks. Each turns raw bytes into the shared
//! `StructuredFields` shape.

pub mod ceh_json;
pub mod dcat_turtle;
pub mod iso_xml;
pub mod schema_org;
pub mod turtle;
pub mod xml_tree;

/// Trimmed, non-empty owned string.
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Last non-empty path segment of a URI.
pub(crate) fn last_segment(uri: &str) -> Option<String> {
    uri.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
