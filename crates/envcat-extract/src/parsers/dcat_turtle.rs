//! DCAT dataset descriptions in Turtle.

use std::sync::LazyLock;

use regex::Regex;

use envcat_core::errors::ExtractionError;
use envcat_core::models::{OnlineResource, Relationship, SpatialExtent};
use envcat_core::{SourceFormat, StructuredFields};

use super::turtle::{Graph, Term};
use super::{clean, last_segment};
use crate::dates::{parse_date, parse_temporal_extent};

const FORMAT: SourceFormat = SourceFormat::Rdf;

const DCAT: &str = "http://www.w3.org/ns/dcat#";
const DCT: &str = "http://purl.org/dc/terms/";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

static WKT_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?").ok());

fn dct(local: &str) -> String {
    format!("{DCT}{local}")
}

fn dcat(local: &str) -> String {
    format!("{DCAT}{local}")
}

pub fn parse(raw: &[u8]) -> Result<StructuredFields, ExtractionError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ExtractionError::parse(FORMAT, format!("turtle is not UTF-8: {e}")))?;
    let graph = Graph::parse(text).map_err(|e| ExtractionError::parse(FORMAT, e.to_string()))?;

    let dataset_type = dcat("Dataset");
    let dataset = graph
        .subjects_of_type(&dataset_type)
        .next()
        .ok_or_else(|| ExtractionError::parse(FORMAT, "no dcat:Dataset subject in graph"))?;

    let literal = |predicate: &str| -> Option<String> {
        clean(graph.object(dataset, predicate).and_then(Term::text))
    };

    let mut fields = StructuredFields::new(FORMAT, raw);
    fields.identifier = dataset.as_iri().and_then(last_segment);
    fields.title = literal(&dct("title"));
    fields.abstract_text = literal(&dct("description"));
    fields.credit_text = literal(&dct("bibliographicCitation"));
    fields.publication_date = literal(&dct("available")).as_deref().and_then(parse_date);
    fields.language = graph
        .object(dataset, &dct("language"))
        .and_then(Term::text)
        .and_then(last_segment)
        .map(|code| code.to_lowercase());
    fields.licence = graph
        .objects(dataset, &dct("license"))
        .find_map(Term::as_iri)
        .map(str::to_string);

    fields.lineage = graph
        .objects(dataset, &dct("provenance"))
        .find_map(|node| clean(graph.object(node, RDFS_LABEL).and_then(Term::text)));

    fields.relationships = graph
        .objects(dataset, &dct("isPartOf"))
        .filter_map(Term::as_iri)
        .filter_map(last_segment)
        .map(|target| Relationship {
            relation_type: "memberOf".to_string(),
            target_source_id: target,
        })
        .collect();

    fields.online_resources = graph
        .objects(dataset, &dcat("landingPage"))
        .filter_map(Term::as_iri)
        .map(|url| OnlineResource {
            url: url.to_string(),
            name: None,
            description: None,
            function: Some("information".to_string()),
            resource_type: None,
        })
        .collect();

    let bbox = dcat("bbox");
    fields.spatial_extent = graph
        .objects(dataset, &dct("spatial"))
        .filter_map(|node| graph.object(node, &bbox).and_then(Term::as_literal))
        .find_map(wkt_bounds);

    let (start, end) = (dcat("startDate"), dcat("endDate"));
    fields.temporal_extent = graph.objects(dataset, &dct("temporal")).find_map(|node| {
        parse_temporal_extent(
            graph.object(node, &start).and_then(Term::text),
            graph.object(node, &end).and_then(Term::text),
        )
    });

    Ok(fields)
}

/// Envelope of every coordinate pair in a WKT geometry.
pub(crate) fn wkt_bounds(wkt: &str) -> Option<SpatialExtent> {
    let re = WKT_NUMBER.as_ref()?;
    let numbers: Vec<f64> = re
        .find_iter(wkt)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if numbers.len() < 2 || numbers.len() % 2 != 0 {
        return None;
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = numbers.chunks_exact(2).map(|p| (p[0], p[1])).unzip();
    let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(SpatialExtent::new(min(&xs), max(&xs), min(&ys), max(&ys)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

<https://catalogue.ceh.ac.uk/id/abc> a dcat:Dataset ;
    dct:title "Heath survey"@en ;
    dct:language <http://publications.europa.eu/resource/authority/language/ENG> ;
    dct:provenance [ rdfs:label "Field counts." ] ;
    dct:isPartOf <https://catalogue.ceh.ac.uk/id/parent> ;
    dct:spatial [ dcat:bbox "POLYGON((-2 50, 1 50, 1 55, -2 55, -2 50))" ] ;
    dct:temporal [ dcat:startDate "2001-01-01" ] .
"#;

    #[test]
    fn maps_dcat_fields() {
        let f = parse(DOC.as_bytes()).unwrap();
        assert_eq!(f.identifier.as_deref(), Some("abc"));
        assert_eq!(f.title.as_deref(), Some("Heath survey"));
        assert_eq!(f.language.as_deref(), Some("eng"));
        assert_eq!(f.lineage.as_deref(), Some("Field counts."));
        assert_eq!(f.relationships[0].target_source_id, "parent");
        assert_eq!(f.relationships[0].relation_type, "memberOf");
        let t = f.temporal_extent.unwrap();
        assert!(t.start.is_some() && t.end.is_none());
    }

    #[test]
    fn wkt_polygon_envelope() {
        let b = wkt_bounds("POLYGON((-2 50, 1 50, 1 55, -2 55, -2 50))").unwrap();
        assert_eq!((b.west, b.east, b.south, b.north), (-2.0, 1.0, 50.0, 55.0));
        assert!(wkt_bounds("POINT(1)").is_none());
    }

    #[test]
    fn graph_without_dataset_fails() {
        let err = parse(b"@prefix ex: <http://example.org/> .\nex:a ex:b ex:c .").unwrap_err();
        assert_eq!(err.format(), SourceFormat::Rdf);
    }
}
