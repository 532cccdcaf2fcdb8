//! Merge policy: per-field source-priority coalescing for scalars,
//! union-with-deduplication for contacts and keywords, first-provider for
//! relationships and online resources.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tracing::warn;

use envcat_core::errors::ReconciliationError;
use envcat_core::models::{Contact, Keyword, KeywordType, RawSourceDocument};
use envcat_core::{SourceFormat, StructuredFields, UnifiedRecord};

/// Field priority orders. First non-null value wins.
pub mod priority {
    use envcat_core::SourceFormat::{self, Json, JsonLd, Rdf, Xml};

    pub const TITLE: &[SourceFormat] = &[Json, JsonLd, Xml, Rdf];
    pub const ABSTRACT: &[SourceFormat] = &[Json, JsonLd, Xml, Rdf];
    pub const DESCRIPTION: &[SourceFormat] = &[Json];
    pub const LINEAGE: &[SourceFormat] = &[Json, Xml, Rdf];
    pub const PUBLICATION_DATE: &[SourceFormat] = &[Json, Xml, JsonLd, Rdf];
    pub const METADATA_DATE: &[SourceFormat] = &[Json, Xml];
    pub const UPDATED_DATE: &[SourceFormat] = &[Json];
    pub const METADATA_STANDARD: &[SourceFormat] = &[Xml];
    pub const LANGUAGE: &[SourceFormat] = &[Xml, Rdf];
    pub const RESOURCE_STATUS: &[SourceFormat] = &[Json];
    pub const RESOURCE_TYPE: &[SourceFormat] = &[Json, Xml];
    pub const CREDIT_TEXT: &[SourceFormat] = &[JsonLd, Rdf];
    pub const ACCESSIBLE_FOR_FREE: &[SourceFormat] = &[JsonLd];
    pub const LICENCE: &[SourceFormat] = &[JsonLd, Rdf];
    pub const SPATIAL: &[SourceFormat] = &[Json, Xml, JsonLd, Rdf];
    pub const TEMPORAL: &[SourceFormat] = &[Json, Xml, JsonLd, Rdf];
    pub const EXTENSIONS: &[SourceFormat] = &[Json];

    pub const CONTACTS: &[SourceFormat] = &[Json, Xml];
    pub const KEYWORDS: &[SourceFormat] = &[Json, Xml, JsonLd];
    pub const RELATIONSHIPS: &[SourceFormat] = &[Json, Rdf];
    pub const ONLINE_RESOURCES: &[SourceFormat] = &[Json, Xml, Rdf];
}

/// Successful extractions for one dataset, keyed by format.
#[derive(Debug, Default)]
pub struct SourceSet {
    by_format: BTreeMap<SourceFormat, StructuredFields>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fields: StructuredFields) {
        self.by_format.insert(fields.format, fields);
    }

    pub fn get(&self, format: SourceFormat) -> Option<&StructuredFields> {
        self.by_format.get(&format)
    }

    pub fn formats(&self) -> impl Iterator<Item = SourceFormat> + '_ {
        self.by_format.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_format.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_format.is_empty()
    }

    fn in_order<'a>(
        &'a self,
        order: &'a [SourceFormat],
    ) -> impl Iterator<Item = &'a StructuredFields> + 'a {
        order.iter().filter_map(|f| self.get(*f))
    }
}

impl FromIterator<StructuredFields> for SourceSet {
    fn from_iter<I: IntoIterator<Item = StructuredFields>>(iter: I) -> Self {
        let mut set = SourceSet::new();
        for fields in iter {
            set.insert(fields);
        }
        set
    }
}

/// First value `pick` yields, consulting sources in `order`.
pub fn coalesce<T>(
    sources: &SourceSet,
    order: &[SourceFormat],
    pick: impl Fn(&StructuredFields) -> Option<T>,
) -> Option<T> {
    sources.in_order(order).find_map(pick)
}

/// Build the unified record for `source_id` from whichever formats succeeded.
pub fn merge(source_id: &str, sources: &SourceSet) -> Result<UnifiedRecord, ReconciliationError> {
    if sources.is_empty() {
        return Err(ReconciliationError::AllSourcesFailed {
            source_id: source_id.to_string(),
            attempted: 0,
        });
    }

    let title = coalesce(sources, priority::TITLE, |f| {
        f.non_blank_title().map(str::to_string)
    })
    .ok_or_else(|| ReconciliationError::EmptyTitle {
        source_id: source_id.to_string(),
    })?;

    let mut record = UnifiedRecord::new(uuid::Uuid::new_v4().to_string(), source_id, title);

    record.abstract_text = coalesce(sources, priority::ABSTRACT, |f| f.abstract_text.clone());
    record.description = coalesce(sources, priority::DESCRIPTION, |f| f.description.clone());
    record.lineage = coalesce(sources, priority::LINEAGE, |f| f.lineage.clone());
    record.publication_date = coalesce(sources, priority::PUBLICATION_DATE, |f| f.publication_date);
    record.metadata_date = coalesce(sources, priority::METADATA_DATE, |f| f.metadata_date);
    record.updated_date = coalesce(sources, priority::UPDATED_DATE, |f| f.updated_date);
    record.metadata_standard =
        coalesce(sources, priority::METADATA_STANDARD, |f| f.metadata_standard.clone());
    record.metadata_standard_version = coalesce(sources, priority::METADATA_STANDARD, |f| {
        f.metadata_standard_version.clone()
    });
    record.language = coalesce(sources, priority::LANGUAGE, |f| f.language.clone());
    record.resource_status =
        coalesce(sources, priority::RESOURCE_STATUS, |f| f.resource_status.clone());
    record.resource_type = coalesce(sources, priority::RESOURCE_TYPE, |f| f.resource_type.clone());
    record.credit_text = coalesce(sources, priority::CREDIT_TEXT, |f| f.credit_text.clone());
    record.is_accessible_for_free = coalesce(sources, priority::ACCESSIBLE_FOR_FREE, |f| {
        f.is_accessible_for_free
    });
    record.licence = coalesce(sources, priority::LICENCE, |f| f.licence.clone());
    record.extensions = coalesce(sources, priority::EXTENSIONS, |f| {
        (!f.extensions.is_empty()).then(|| f.extensions.clone())
    })
    .unwrap_or_default();

    record.spatial_extent = coalesce(sources, priority::SPATIAL, |f| {
        let extent = f.spatial_extent?;
        let valid = extent.validated();
        if valid.is_none() {
            warn!(source_id, format = %f.format, ?extent, "discarding invalid spatial extent");
        }
        valid
    });
    record.temporal_extent = coalesce(sources, priority::TEMPORAL, |f| f.temporal_extent);
    if let Some(extent) = record.temporal_extent.filter(|t| t.is_inverted()) {
        warn!(source_id, ?extent, "temporal extent starts after it ends");
    }

    record.contacts = merge_contacts(sources.in_order(priority::CONTACTS).map(|f| f.contacts.as_slice()));
    record.keywords = merge_keywords(sources.in_order(priority::KEYWORDS).map(|f| f.keywords.as_slice()));
    record.relationships = coalesce(sources, priority::RELATIONSHIPS, |f| {
        (!f.relationships.is_empty()).then(|| f.relationships.clone())
    })
    .unwrap_or_default();
    record.online_resources = coalesce(sources, priority::ONLINE_RESOURCES, |f| {
        (!f.online_resources.is_empty()).then(|| f.online_resources.clone())
    })
    .unwrap_or_default();

    let retrieved_at = Utc::now();
    record.raw_documents = sources
        .by_format
        .values()
        .map(|f| RawSourceDocument {
            format: f.format,
            content: f.raw_payload.clone(),
            size_bytes: f.raw_size,
            retrieved_at,
        })
        .collect();

    Ok(record)
}

fn normalise(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Identity of a contact across sources: (display name, email, role).
/// The same party in two roles stays two contacts.
fn contact_key(contact: &Contact) -> (String, String, String) {
    (
        contact.display_name().as_deref().map(normalise).unwrap_or_default(),
        contact.email.as_deref().map(normalise).unwrap_or_default(),
        normalise(&contact.role),
    )
}

/// Union of contact lists in the given order. A later duplicate fills
/// fields the first occurrence lacks.
pub fn merge_contacts<'a>(lists: impl IntoIterator<Item = &'a [Contact]>) -> Vec<Contact> {
    let mut merged: Vec<Contact> = Vec::new();
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    for contact in lists.into_iter().flatten() {
        let key = contact_key(contact);
        match index.get(&key) {
            Some(&i) => merged[i].absorb(contact),
            None => {
                index.insert(key, merged.len());
                merged.push(contact.clone());
            }
        }
    }
    merged
}

/// Union of keyword lists deduplicated by (case-folded text, type). URI-less
/// keywords borrow the URI and term set of any keyword with the same text.
pub fn merge_keywords<'a>(lists: impl IntoIterator<Item = &'a [Keyword]>) -> Vec<Keyword> {
    let mut merged: Vec<Keyword> = Vec::new();
    let mut index: HashMap<(String, KeywordType), usize> = HashMap::new();
    let mut vocabulary: HashMap<String, (Option<String>, Option<String>)> = HashMap::new();

    for keyword in lists.into_iter().flatten() {
        let folded = keyword.folded();
        if keyword.uri.is_some() {
            vocabulary
                .entry(folded.clone())
                .or_insert_with(|| (keyword.uri.clone(), keyword.defined_term_set.clone()));
        }
        match index.get(&(folded.clone(), keyword.keyword_type)) {
            Some(&i) => {
                let existing = &mut merged[i];
                if existing.uri.is_none() {
                    existing.uri.clone_from(&keyword.uri);
                }
                if existing.defined_term_set.is_none() {
                    existing.defined_term_set.clone_from(&keyword.defined_term_set);
                }
            }
            None => {
                index.insert((folded, keyword.keyword_type), merged.len());
                merged.push(keyword.clone());
            }
        }
    }

    for keyword in merged.iter_mut().filter(|k| k.uri.is_none()) {
        if let Some((uri, term_set)) = vocabulary.get(&keyword.folded()) {
            keyword.uri.clone_from(uri);
            if keyword.defined_term_set.is_none() {
                keyword.defined_term_set.clone_from(term_set);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use envcat_core::models::SpatialExtent;
    use proptest::prelude::*;

    fn fields(format: SourceFormat, title: Option<&str>) -> StructuredFields {
        let mut f = StructuredFields::new(format, b"payload");
        f.identifier = Some("ds-1".into());
        f.title = title.map(str::to_string);
        f
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SCALARS
    // ═══════════════════════════════════════════════════════════════════════

    /// null / "Soil Carbon UK" / "Soil-C-UK" under priority [json, jsonld, rdf].
    #[test]
    fn title_skips_missing_priority_source() {
        let sources: SourceSet = [
            fields(SourceFormat::Json, None),
            fields(SourceFormat::JsonLd, Some("Soil Carbon UK")),
            fields(SourceFormat::Rdf, Some("Soil-C-UK")),
        ]
        .into_iter()
        .collect();
        let record = merge("ds-1", &sources).unwrap();
        assert_eq!(record.title, "Soil Carbon UK");
        assert_eq!(record.source_id, "ds-1");
        assert_eq!(record.raw_documents.len(), 3);
    }

    /// One successful source is enough for a valid record.
    #[test]
    fn single_source_degrades_gracefully() {
        let mut only = fields(SourceFormat::Rdf, Some("Only RDF"));
        only.language = Some("eng".into());
        let record = merge("ds-1", &[only].into_iter().collect::<SourceSet>()).unwrap();
        assert_eq!(record.title, "Only RDF");
        assert_eq!(record.language.as_deref(), Some("eng"));
        assert!(record.contacts.is_empty());
    }

    #[test]
    fn no_sources_is_all_failed() {
        let err = merge("ds-1", &SourceSet::new()).unwrap_err();
        assert!(matches!(err, ReconciliationError::AllSourcesFailed { .. }));
    }

    #[test]
    fn blank_titles_everywhere_reject_the_record() {
        let sources: SourceSet = [
            fields(SourceFormat::Json, Some("   ")),
            fields(SourceFormat::Xml, None),
        ]
        .into_iter()
        .collect();
        let err = merge("ds-1", &sources).unwrap_err();
        assert!(matches!(err, ReconciliationError::EmptyTitle { .. }));
    }

    /// An invalid box in the preferred source falls through to the next.
    #[test]
    fn invalid_spatial_extent_falls_through() {
        let mut json = fields(SourceFormat::Json, Some("T"));
        json.spatial_extent = Some(SpatialExtent::new(-200.0, 1.0, 50.0, 55.0));
        let mut xml = fields(SourceFormat::Xml, Some("T"));
        xml.spatial_extent = Some(SpatialExtent::new(-2.0, 1.0, 50.0, 95.0));
        let record = merge("ds-1", &[json, xml].into_iter().collect::<SourceSet>()).unwrap();
        let extent = record.spatial_extent.unwrap();
        assert_eq!(extent.west, -2.0);
        assert_eq!(extent.north, 90.0);
    }

    #[test]
    fn relationships_come_from_first_provider_only() {
        use envcat_core::models::Relationship;
        let rel = |t: &str| Relationship {
            relation_type: "memberOf".into(),
            target_source_id: t.into(),
        };
        let json = fields(SourceFormat::Json, Some("T"));
        let mut rdf = fields(SourceFormat::Rdf, Some("T"));
        rdf.relationships = vec![rel("parent")];
        let record = merge("ds-1", &[json, rdf].into_iter().collect::<SourceSet>()).unwrap();
        assert_eq!(record.relationships, vec![rel("parent")]);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COLLECTIONS
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn contacts_dedup_on_name_and_email_and_absorb() {
        let a = Contact {
            full_name: Some("Emmett, Bridget".into()),
            email: Some("BAE@ceh.ac.uk".into()),
            ..Contact::with_role("author")
        };
        let b = Contact {
            full_name: Some("emmett,  bridget".into()),
            email: Some("bae@ceh.ac.uk".into()),
            name_identifier: Some("https://orcid.org/0000-0002-1825-0097".into()),
            ..Contact::with_role("author")
        };
        let merged = merge_contacts([std::slice::from_ref(&a), std::slice::from_ref(&b)]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].name_identifier.is_some());
        assert_eq!(merged[0].email.as_deref(), Some("BAE@ceh.ac.uk"));
    }

    #[test]
    fn contacts_in_different_roles_are_kept_apart() {
        let person = |role: &str| Contact {
            full_name: Some("Emmett, Bridget".into()),
            email: Some("bae@ceh.ac.uk".into()),
            ..Contact::with_role(role)
        };
        let json = [person("author"), person("pointOfContact")];
        let xml = [person("pointOfContact")];
        let merged = merge_contacts([json.as_slice(), xml.as_slice()]);

        let roles: Vec<&str> = merged.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["author", "pointOfContact"]);
    }

    #[test]
    fn keywords_enriched_across_types() {
        let plain = Keyword::new("Great Britain", KeywordType::Place);
        let with_uri = Keyword::new("great britain", KeywordType::Theme)
            .with_uri(Some("http://sws.geonames.org/2635167".into()));
        let merged = merge_keywords([
            std::slice::from_ref(&plain),
            std::slice::from_ref(&with_uri),
        ]);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|k| k.uri.is_some()));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PROPERTIES
    // ═══════════════════════════════════════════════════════════════════════

    fn format_strategy() -> impl Strategy<Value = SourceFormat> {
        prop::sample::select(SourceFormat::ALL.to_vec())
    }

    proptest! {
        /// If the highest-priority source has a title, it wins regardless of
        /// what the others carry.
        #[test]
        fn coalesce_prefers_first_present_source(
            titles in prop::collection::vec(prop::option::of("[A-Za-z]{1,12}"), 4),
        ) {
            let sources: SourceSet = priority::TITLE
                .iter()
                .zip(&titles)
                .map(|(format, title)| fields(*format, title.as_deref()))
                .collect();
            let expected = titles.iter().flatten().next().cloned();
            let got = coalesce(&sources, priority::TITLE, |f| f.title.clone());
            prop_assert_eq!(got, expected);
        }

        /// Merging a keyword list with itself changes nothing.
        #[test]
        fn keyword_dedup_is_idempotent(
            texts in prop::collection::vec("[a-c]{1,3}", 0..12),
            kinds in prop::collection::vec(
                prop::sample::select(vec![KeywordType::Theme, KeywordType::Place]), 12),
        ) {
            let list: Vec<Keyword> = texts
                .iter()
                .zip(&kinds)
                .map(|(t, k)| Keyword::new(t.clone(), *k))
                .collect();
            let once = merge_keywords([list.as_slice()]);
            let twice = merge_keywords([list.as_slice(), list.as_slice()]);
            prop_assert_eq!(&once, &twice);
            let again = merge_keywords([once.as_slice()]);
            prop_assert_eq!(once, again);
        }

        /// The merged record never depends on formats absent from the set.
        #[test]
        fn any_single_source_yields_record(format in format_strategy()) {
            let sources: SourceSet = [fields(format, Some("Title"))].into_iter().collect();
            let record = merge("ds-1", &sources).unwrap();
            prop_assert_eq!(record.raw_documents.len(), 1);
            prop_assert_eq!(record.raw_documents[0].format, format);
        }
    }
}
