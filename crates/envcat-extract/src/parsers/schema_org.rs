//! schema.org `Dataset` in JSON-LD, either inside `@graph` or at the top level.

use serde_json::Value;

use envcat_core::errors::ExtractionError;
use envcat_core::models::{Keyword, KeywordType, SpatialExtent};
use envcat_core::{SourceFormat, StructuredFields};

use super::{clean, last_segment};
use crate::dates::{parse_date, parse_temporal_extent};

const FORMAT: SourceFormat = SourceFormat::JsonLd;

/// Flattened view of the document: the dataset node plus every node that
/// can be referenced by `@id`.
struct Document<'a> {
    dataset: &'a Value,
    nodes: Vec<&'a Value>,
}

impl<'a> Document<'a> {
    fn new(root: &'a Value) -> Result<Self, ExtractionError> {
        let nodes: Vec<&Value> = match root.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().collect(),
            None => vec![root],
        };
        let dataset = nodes
            .iter()
            .copied()
            .find(|n| has_type(n, "Dataset"))
            .ok_or_else(|| ExtractionError::parse(FORMAT, "no Dataset node in JSON-LD"))?;
        Ok(Self { dataset, nodes })
    }

    /// Follow a `{"@id": ...}` reference; inline objects resolve to themselves.
    fn resolve(&self, value: &'a Value) -> Option<&'a Value> {
        let obj = value.as_object()?;
        match obj.get("@id").and_then(Value::as_str) {
            Some(id) if obj.len() == 1 => self
                .nodes
                .iter()
                .copied()
                .find(|n| n.get("@id").and_then(Value::as_str) == Some(id)),
            _ => Some(value),
        }
    }

    fn str_field(&self, key: &str) -> Option<String> {
        clean(self.dataset.get(key).and_then(Value::as_str))
    }
}

fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

/// A value that may be a single item or an array of items.
fn many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

pub fn parse(raw: &[u8]) -> Result<StructuredFields, ExtractionError> {
    let root: Value = serde_json::from_slice(raw)
        .map_err(|e| ExtractionError::parse(FORMAT, format!("invalid JSON-LD: {e}")))?;
    let doc = Document::new(&root)?;
    let dataset = doc.dataset;

    let mut fields = StructuredFields::new(FORMAT, raw);
    fields.identifier = dataset
        .get("@id")
        .and_then(Value::as_str)
        .and_then(last_segment)
        .or_else(|| doc.str_field("identifier"));
    fields.title = doc.str_field("name");
    fields.abstract_text = doc.str_field("description");
    fields.credit_text = doc.str_field("creditText");
    fields.is_accessible_for_free = match dataset.get("isAccessibleForFree") {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    fields.publication_date = dataset
        .get("datePublished")
        .and_then(Value::as_str)
        .and_then(parse_date);
    fields.licence = licence(dataset.get("license"));
    fields.keywords = many(dataset.get("keywords"))
        .into_iter()
        .filter_map(keyword)
        .collect();
    fields.spatial_extent = many(dataset.get("spatialCoverage"))
        .into_iter()
        .find_map(|place| spatial(&doc, place));
    fields.temporal_extent = many(dataset.get("temporalCoverage"))
        .into_iter()
        .filter_map(Value::as_str)
        .find_map(|span| {
            let (start, end) = span.split_once('/')?;
            parse_temporal_extent(open_bound(start), open_bound(end))
        });

    Ok(fields)
}

/// `..` marks an open interval end.
fn open_bound(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty() && s != "..").then_some(s)
}

fn licence(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => clean(Some(s.as_str())),
        Value::Array(items) => items.first().and_then(|v| licence(Some(v))),
        obj @ Value::Object(_) => clean(
            obj.get("@id")
                .or_else(|| obj.get("url"))
                .and_then(Value::as_str),
        ),
        _ => None,
    }
}

fn keyword(value: &Value) -> Option<Keyword> {
    match value {
        Value::String(text) => Some(Keyword::new(clean(Some(text.as_str()))?, KeywordType::Theme)),
        Value::Object(_) => {
            let text = clean(value.get("name").and_then(Value::as_str))?;
            let uri = clean(
                value
                    .get("url")
                    .or_else(|| value.get("@id"))
                    .and_then(Value::as_str),
            );
            let term_set = match value.get("inDefinedTermSet") {
                Some(Value::String(s)) => clean(Some(s.as_str())),
                Some(obj @ Value::Object(_)) => clean(
                    obj.get("@id")
                        .or_else(|| obj.get("url"))
                        .and_then(Value::as_str),
                ),
                _ => None,
            };
            let mut keyword = Keyword::new(text, KeywordType::Theme).with_uri(uri);
            keyword.defined_term_set = term_set;
            Some(keyword)
        }
        _ => None,
    }
}

fn spatial<'a>(doc: &Document<'a>, coverage: &'a Value) -> Option<SpatialExtent> {
    let place = doc.resolve(coverage)?;
    many(place.get("geo"))
        .into_iter()
        .filter_map(|geo| doc.resolve(geo))
        .filter_map(|shape| shape.get("box").and_then(Value::as_str))
        .find_map(parse_box)
}

/// GeoShape box in either `"west south, east north"` or the schema.org
/// `"south west north east"` form.
pub(crate) fn parse_box(text: &str) -> Option<SpatialExtent> {
    let numbers = |s: &str| -> Option<Vec<f64>> {
        s.split_whitespace().map(|n| n.parse::<f64>().ok()).collect()
    };
    match text.split_once(',') {
        Some((lower, upper)) => {
            let lower = numbers(lower)?;
            let upper = numbers(upper)?;
            match (lower.as_slice(), upper.as_slice()) {
                ([west, south], [east, north]) => {
                    Some(SpatialExtent::new(*west, *east, *south, *north))
                }
                _ => None,
            }
        }
        None => match numbers(text)?.as_slice() {
            [south, west, north, east] => Some(SpatialExtent::new(*west, *east, *south, *north)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_value(v: Value) -> Result<StructuredFields, ExtractionError> {
        parse(v.to_string().as_bytes())
    }

    #[test]
    fn top_level_dataset_without_graph() {
        let f = parse_value(json!({
            "@context": "https://schema.org/",
            "@type": "Dataset",
            "@id": "https://catalogue.ceh.ac.uk/id/abc",
            "name": "Flow",
            "isAccessibleForFree": "true"
        }))
        .unwrap();
        assert_eq!(f.identifier.as_deref(), Some("abc"));
        assert_eq!(f.is_accessible_for_free, Some(true));
    }

    #[test]
    fn missing_dataset_is_a_parse_error() {
        let err = parse_value(json!({"@graph": [{"@type": "Person"}]})).unwrap_err();
        assert_eq!(err.format(), SourceFormat::JsonLd);
    }

    #[test]
    fn box_forms() {
        let a = parse_box("-8.648 49.864, 1.768 60.861").unwrap();
        assert_eq!((a.west, a.south, a.east, a.north), (-8.648, 49.864, 1.768, 60.861));
        let b = parse_box("51.2 -3.9 52.9 0.6").unwrap();
        assert_eq!((b.west, b.south, b.east, b.north), (-3.9, 51.2, 0.6, 52.9));
        assert!(parse_box("1 2 3").is_none());
        assert!(parse_box("a b, c d").is_none());
    }

    #[test]
    fn inline_spatial_coverage_and_open_temporal_end() {
        let f = parse_value(json!({
            "@type": "Dataset",
            "@id": "x",
            "spatialCoverage": {"@type": "Place", "geo": {"@type": "GeoShape", "box": "50 -2 51 -1"}},
            "temporalCoverage": "2015-01-01/.."
        }))
        .unwrap();
        assert_eq!(f.spatial_extent.unwrap().west, -2.0);
        let t = f.temporal_extent.unwrap();
        assert!(t.start.is_some());
        assert!(t.end.is_none());
    }

    #[test]
    fn defined_terms_carry_uri_and_term_set() {
        let f = parse_value(json!({
            "@type": "Dataset",
            "@id": "x",
            "keywords": ["plain", {"@type": "DefinedTerm", "name": "Topsoil",
                                   "url": "http://v/topsoil", "inDefinedTermSet": "http://v"}]
        }))
        .unwrap();
        assert_eq!(f.keywords.len(), 2);
        assert_eq!(f.keywords[1].uri.as_deref(), Some("http://v/topsoil"));
        assert_eq!(f.keywords[1].defined_term_set.as_deref(), Some("http://v"));
    }

    #[test]
    fn licence_from_object() {
        let f = parse_value(json!({
            "@type": "Dataset", "@id": "x",
            "license": {"@id": "https://example.org/ogl"}
        }))
        .unwrap();
        assert_eq!(f.licence.as_deref(), Some("https://example.org/ogl"));
    }
}
