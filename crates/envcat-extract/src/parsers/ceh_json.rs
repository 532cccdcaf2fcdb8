//! CEH catalogue JSON.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use envcat_core::errors::ExtractionError;
use envcat_core::models::{Contact, Keyword, KeywordType, OnlineResource, Relationship, SpatialExtent};
use envcat_core::{SourceFormat, StructuredFields};

use super::clean;
use crate::dates::{parse_date, parse_datetime, parse_temporal_extent};

const FORMAT: SourceFormat = SourceFormat::Json;

/// Source keys copied verbatim into `extensions`, with their stored names.
const EXTENSION_FIELDS: &[(&str, &str)] = &[
    ("service", "service"),
    ("spatialResolutions", "spatial_resolutions"),
    ("distributionFormats", "distribution_formats"),
    ("funding", "funding"),
    ("inspireThemes", "inspire_themes"),
    ("spatialReferenceSystems", "spatial_reference_systems"),
    ("useConstraints", "use_constraints"),
    ("licences", "licences"),
    ("topicCategories", "topic_categories"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CehDocument {
    id: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    title: Option<String>,
    description: Option<String>,
    lineage: Option<String>,
    resource_status: Option<String>,
    publication_date: Option<String>,
    dataset_reference_date: Option<ReferenceDates>,
    metadata_date: Option<String>,
    updated_date: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    bounding_boxes: Vec<BoundingBox>,
    #[serde(deserialize_with = "null_as_empty")]
    temporal_extents: Vec<TemporalSpan>,
    #[serde(deserialize_with = "null_as_empty")]
    responsible_parties: Vec<Party>,
    #[serde(deserialize_with = "null_as_empty")]
    keywords_theme: Vec<KeywordEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    keywords_place: Vec<KeywordEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    keywords_project: Vec<KeywordEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    keywords_other: Vec<KeywordEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    relationships: Vec<RelationshipEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    online_resources: Vec<LinkEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    info_links: Vec<LinkEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReferenceDates {
    publication_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BoundingBox {
    west_bound_longitude: Option<Value>,
    east_bound_longitude: Option<Value>,
    south_bound_latitude: Option<Value>,
    north_bound_latitude: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemporalSpan {
    begin: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Party {
    role: Option<String>,
    full_name: Option<String>,
    individual_name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    honorific_prefix: Option<String>,
    organisation_name: Option<String>,
    organisation_identifier: Option<String>,
    name_identifier: Option<String>,
    position_name: Option<String>,
    email: Option<String>,
    address: Option<Value>,
}

/// Keywords arrive either as bare strings or as `{value, uri}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordEntry {
    Plain(String),
    Tagged {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        uri: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelationshipEntry {
    relation: Option<String>,
    target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LinkEntry {
    url: Option<String>,
    name: Option<String>,
    description: Option<String>,
    function: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse(raw: &[u8]) -> Result<StructuredFields, ExtractionError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| ExtractionError::parse(FORMAT, format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(ExtractionError::parse(FORMAT, "top-level value is not an object"));
    }
    let doc: CehDocument = serde_json::from_value(value.clone())
        .map_err(|e| ExtractionError::parse(FORMAT, format!("unexpected structure: {e}")))?;

    let mut fields = StructuredFields::new(FORMAT, raw);
    fields.identifier = clean(doc.id.as_deref());
    fields.title = clean(doc.title.as_deref());
    // The catalogue only has `description`; it doubles as the abstract.
    fields.abstract_text = clean(doc.description.as_deref());
    fields.description = fields.abstract_text.clone();
    fields.lineage = clean(doc.lineage.as_deref());
    fields.resource_status = clean(doc.resource_status.as_deref());
    fields.resource_type = clean(doc.resource_type.as_deref());

    fields.publication_date = doc
        .publication_date
        .as_deref()
        .or_else(|| {
            doc.dataset_reference_date
                .as_ref()
                .and_then(|r| r.publication_date.as_deref())
        })
        .and_then(parse_date);
    fields.metadata_date = doc.metadata_date.as_deref().and_then(parse_datetime);
    fields.updated_date = doc.updated_date.as_deref().and_then(parse_date);

    fields.spatial_extent = doc.bounding_boxes.first().and_then(bounding_box);
    fields.temporal_extent = doc
        .temporal_extents
        .first()
        .and_then(|t| parse_temporal_extent(t.begin.as_deref(), t.end.as_deref()));

    fields.contacts = doc.responsible_parties.into_iter().filter_map(contact).collect();

    let keyword_groups = [
        (doc.keywords_theme, KeywordType::Theme),
        (doc.keywords_other, KeywordType::Other),
        (doc.keywords_project, KeywordType::Project),
        (doc.keywords_place, KeywordType::Place),
    ];
    for (entries, keyword_type) in keyword_groups {
        fields
            .keywords
            .extend(entries.into_iter().filter_map(|e| keyword(e, keyword_type)));
    }

    fields.relationships = doc
        .relationships
        .into_iter()
        .filter_map(|rel| {
            let relation = clean(rel.relation.as_deref())?;
            let target = clean(rel.target.as_deref())?;
            let relation_type = match relation.rsplit_once('#') {
                Some((_, fragment)) => fragment.to_string(),
                None => relation,
            };
            Some(Relationship {
                relation_type,
                target_source_id: target,
            })
        })
        .collect();

    fields.online_resources = doc
        .online_resources
        .into_iter()
        .chain(doc.info_links)
        .filter_map(|link| {
            Some(OnlineResource {
                url: clean(link.url.as_deref())?,
                name: clean(link.name.as_deref()),
                description: clean(link.description.as_deref()),
                function: clean(link.function.as_deref()),
                resource_type: clean(link.resource_type.as_deref()),
            })
        })
        .collect();

    fields.extensions = extensions(&value);
    Ok(fields)
}

fn coordinate(value: &Option<Value>) -> Option<f64> {
    match value.as_ref()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bounding_box(bbox: &BoundingBox) -> Option<SpatialExtent> {
    Some(SpatialExtent::new(
        coordinate(&bbox.west_bound_longitude)?,
        coordinate(&bbox.east_bound_longitude)?,
        coordinate(&bbox.south_bound_latitude)?,
        coordinate(&bbox.north_bound_latitude)?,
    ))
}

/// Parties without a role are dropped.
fn contact(party: Party) -> Option<Contact> {
    let role = clean(party.role.as_deref())?;
    Some(Contact {
        full_name: clean(party.full_name.as_deref().or(party.individual_name.as_deref())),
        given_name: clean(party.given_name.as_deref()),
        family_name: clean(party.family_name.as_deref()),
        honorific_prefix: clean(party.honorific_prefix.as_deref()),
        organisation_name: clean(party.organisation_name.as_deref()),
        organisation_identifier: clean(party.organisation_identifier.as_deref()),
        name_identifier: clean(party.name_identifier.as_deref()),
        position_name: clean(party.position_name.as_deref()),
        email: clean(party.email.as_deref()),
        address: party.address.filter(|a| !a.is_null()),
        ..Contact::with_role(role)
    })
}

fn keyword(entry: KeywordEntry, keyword_type: KeywordType) -> Option<Keyword> {
    let (text, uri) = match entry {
        KeywordEntry::Plain(text) => (clean(Some(text.as_str())), None),
        KeywordEntry::Tagged { value, uri } => (clean(value.as_deref()), clean(uri.as_deref())),
    };
    // Project keywords never carry a URI in the catalogue.
    let uri = uri.filter(|_| keyword_type != KeywordType::Project);
    Some(Keyword::new(text?, keyword_type).with_uri(uri))
}

fn extensions(value: &Value) -> BTreeMap<String, Value> {
    EXTENSION_FIELDS
        .iter()
        .filter_map(|(source, stored)| {
            value
                .get(*source)
                .filter(|v| !v.is_null())
                .map(|v| (stored.to_string(), v.clone()))
        })
        .collect()
}
