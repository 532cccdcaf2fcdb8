//! ISO 19115 / UK GEMINI XML.

use envcat_core::errors::ExtractionError;
use envcat_core::models::{Contact, Keyword, KeywordType, OnlineResource, SpatialExtent};
use envcat_core::{SourceFormat, StructuredFields};

use super::clean;
use super::xml_tree::XmlElement;
use crate::dates::{parse_date, parse_datetime, parse_temporal_extent};

const FORMAT: SourceFormat = SourceFormat::Xml;

pub fn parse(raw: &[u8]) -> Result<StructuredFields, ExtractionError> {
    let root = XmlElement::parse(raw).map_err(|e| ExtractionError::parse(FORMAT, e))?;
    let mut fields = StructuredFields::new(FORMAT, raw);

    fields.identifier = clean(root.select_text("//fileIdentifier/CharacterString"));
    fields.title = clean(root.select_text("//identificationInfo//citation//title/CharacterString"));
    fields.abstract_text = clean(root.select_text("//identificationInfo//abstract/CharacterString"));
    fields.lineage = clean(root.select_text("//lineage//statement/CharacterString"));

    fields.contacts = extract_contacts(&root);
    fields.keywords = extract_keywords(&root);
    fields.online_resources = extract_online_resources(&root);

    fields.temporal_extent = parse_temporal_extent(
        root.select_text("//temporalElement//TimePeriod//beginPosition"),
        root.select_text("//temporalElement//TimePeriod//endPosition"),
    );
    fields.spatial_extent = extract_bounding_box(&root);

    fields.publication_date = citation_date(&root, "publication").and_then(parse_date);
    fields.metadata_date = root
        .select_text("//dateStamp/DateTime")
        .or_else(|| root.select_text("//dateStamp/Date"))
        .and_then(parse_datetime);

    fields.metadata_standard = clean(
        root.select_text("//metadataStandardName/CharacterString")
            .or_else(|| root.select_text("//metadataStandardName/Anchor")),
    );
    fields.metadata_standard_version =
        clean(root.select_text("//metadataStandardVersion/CharacterString"));
    fields.language = extract_language(&root);
    fields.resource_type = root
        .select("//hierarchyLevel/MD_ScopeCode")
        .and_then(|e| e.attr("codeListValue"))
        .map(str::to_string);

    Ok(fields)
}

/// Text of a name that may be a CharacterString or an xlink Anchor, plus the
/// Anchor's href.
fn name_or_anchor<'a>(party: &'a XmlElement, field: &str) -> (Option<&'a str>, Option<&'a str>) {
    if let Some(text) = party.select_text(&format!("//{field}/CharacterString")) {
        return (Some(text), None);
    }
    match party.select(&format!("//{field}/Anchor")) {
        Some(anchor) => (anchor.text(), anchor.attr("href")),
        None => (None, None),
    }
}

fn extract_contacts(root: &XmlElement) -> Vec<Contact> {
    let mut parties = root.select_all("//contact//CI_ResponsibleParty");
    parties.extend(root.select_all("//identificationInfo//pointOfContact//CI_ResponsibleParty"));

    parties
        .into_iter()
        .filter_map(|party| {
            // Role is required.
            let role = party
                .select("//role//CI_RoleCode")
                .and_then(|e| e.attr("codeListValue"))
                .and_then(|r| clean(Some(r)))?;

            let (individual, person_href) = name_or_anchor(party, "individualName");
            let (organisation, org_href) = name_or_anchor(party, "organisationName");

            Some(Contact {
                full_name: clean(individual),
                name_identifier: person_href
                    .filter(|h| h.contains("orcid.org"))
                    .map(str::to_string),
                organisation_name: clean(organisation),
                organisation_identifier: org_href
                    .filter(|h| h.contains("ror.org"))
                    .map(str::to_string),
                email: clean(party.select_text("//electronicMailAddress/CharacterString")),
                position_name: clean(party.select_text("//positionName/CharacterString")),
                ..Contact::with_role(role)
            })
        })
        .collect()
}

fn extract_keywords(root: &XmlElement) -> Vec<Keyword> {
    let mut keywords = Vec::new();
    for block in root.select_all("//descriptiveKeywords//MD_Keywords") {
        let keyword_type = block
            .select("//type//MD_KeywordTypeCode")
            .and_then(|e| e.attr("codeListValue"))
            .and_then(|v| v.parse::<KeywordType>().ok())
            .unwrap_or(KeywordType::Theme);
        let thesaurus = clean(block.select_text("//thesaurusName//title/CharacterString"));

        for kw in block.select_all("//keyword") {
            let (text, href) = match kw.select("/CharacterString") {
                Some(cs) => (cs.text(), None),
                None => match kw.select("/Anchor") {
                    Some(anchor) => (anchor.text(), anchor.attr("href")),
                    None => (None, None),
                },
            };
            if let Some(text) = clean(text) {
                let mut keyword = Keyword::new(text, keyword_type).with_uri(clean(href));
                keyword.defined_term_set = thesaurus.clone();
                keywords.push(keyword);
            }
        }
    }
    keywords
}

fn extract_online_resources(root: &XmlElement) -> Vec<OnlineResource> {
    root.select_all("//distributionInfo//transferOptions//onLine//CI_OnlineResource")
        .into_iter()
        .filter_map(|res| {
            let url = clean(res.select_text("//URL"))?;
            Some(OnlineResource {
                url,
                name: clean(res.select_text("//name/CharacterString")),
                description: clean(res.select_text("//description/CharacterString")),
                function: res
                    .select("//function//CI_OnLineFunctionCode")
                    .and_then(|e| e.attr("codeListValue"))
                    .map(str::to_string),
                resource_type: None,
            })
        })
        .collect()
}

fn extract_bounding_box(root: &XmlElement) -> Option<SpatialExtent> {
    let coord = |name: &str| -> Option<f64> {
        root.select_text(&format!("//{name}/Decimal"))?
            .parse::<f64>()
            .ok()
    };
    Some(SpatialExtent::new(
        coord("westBoundLongitude")?,
        coord("eastBoundLongitude")?,
        coord("southBoundLatitude")?,
        coord("northBoundLatitude")?,
    ))
}

/// Citation date whose `CI_DateTypeCode` equals `date_type`.
fn citation_date<'a>(root: &'a XmlElement, date_type: &str) -> Option<&'a str> {
    root.select_all("//identificationInfo//citation//CI_Date")
        .into_iter()
        .find(|d| {
            d.select("//dateType//CI_DateTypeCode")
                .and_then(|c| c.attr("codeListValue"))
                == Some(date_type)
        })
        .and_then(|d| {
            d.select_text("/date/Date")
                .or_else(|| d.select_text("/date/DateTime"))
        })
}

fn extract_language(root: &XmlElement) -> Option<String> {
    if let Some(text) = root.select_text("//language/CharacterString") {
        return clean(Some(text));
    }
    let code = root.select("//language//LanguageCode")?;
    clean(code.attr("codeListValue").or_else(|| code.text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd"
                 xmlns:gco="http://www.isotc211.org/2005/gco"
                 xmlns:gmx="http://www.isotc211.org/2005/gmx"
                 xmlns:xlink="http://www.w3.org/1999/xlink">
  <gmd:fileIdentifier><gco:CharacterString>abc-123</gco:CharacterString></gmd:fileIdentifier>
  <gmd:language><gmd:LanguageCode codeListValue="eng">English</gmd:LanguageCode></gmd:language>
  <gmd:dateStamp><gco:DateTime>2021-03-02T11:04:17</gco:DateTime></gmd:dateStamp>
  <gmd:identificationInfo>
    <gmd:MD_DataIdentification>
      <gmd:citation><gmd:CI_Citation>
        <gmd:title><gco:CharacterString>Moorland Bird Counts</gco:CharacterString></gmd:title>
        <gmd:date><gmd:CI_Date>
          <gmd:date><gco:Date>2019-05-01</gco:Date></gmd:date>
          <gmd:dateType><gmd:CI_DateTypeCode codeListValue="creation"/></gmd:dateType>
        </gmd:CI_Date></gmd:date>
        <gmd:date><gmd:CI_Date>
          <gmd:date><gco:Date>2019-07-01</gco:Date></gmd:date>
          <gmd:dateType><gmd:CI_DateTypeCode codeListValue="publication"/></gmd:dateType>
        </gmd:CI_Date></gmd:date>
      </gmd:CI_Citation></gmd:citation>
      <gmd:pointOfContact><gmd:CI_ResponsibleParty>
        <gmd:individualName>
          <gmx:Anchor xlink:href="https://orcid.org/0000-0001-2345-6789">Doe, Jo</gmx:Anchor>
        </gmd:individualName>
        <gmd:role><gmd:CI_RoleCode codeListValue="author"/></gmd:role>
      </gmd:CI_ResponsibleParty></gmd:pointOfContact>
      <gmd:pointOfContact><gmd:CI_ResponsibleParty>
        <gmd:individualName><gco:CharacterString>No Role</gco:CharacterString></gmd:individualName>
      </gmd:CI_ResponsibleParty></gmd:pointOfContact>
      <gmd:descriptiveKeywords><gmd:MD_Keywords>
        <gmd:keyword><gco:CharacterString>Upland</gco:CharacterString></gmd:keyword>
        <gmd:type><gmd:MD_KeywordTypeCode codeListValue="place"/></gmd:type>
      </gmd:MD_Keywords></gmd:descriptiveKeywords>
      <gmd:extent><gmd:EX_Extent><gmd:geographicElement><gmd:EX_GeographicBoundingBox>
        <gmd:westBoundLongitude><gco:Decimal>-4.0</gco:Decimal></gmd:westBoundLongitude>
        <gmd:eastBoundLongitude><gco:Decimal>-3.0</gco:Decimal></gmd:eastBoundLongitude>
        <gmd:southBoundLatitude><gco:Decimal>52.0</gco:Decimal></gmd:southBoundLatitude>
      </gmd:EX_GeographicBoundingBox></gmd:geographicElement></gmd:EX_Extent></gmd:extent>
    </gmd:MD_DataIdentification>
  </gmd:identificationInfo>
</gmd:MD_Metadata>"#;

    #[test]
    fn core_fields() {
        let f = parse(RECORD.as_bytes()).unwrap();
        assert_eq!(f.identifier.as_deref(), Some("abc-123"));
        assert_eq!(f.title.as_deref(), Some("Moorland Bird Counts"));
        assert_eq!(f.language.as_deref(), Some("eng"));
        assert_eq!(f.publication_date.unwrap().to_string(), "2019-07-01");
        assert_eq!(f.metadata_date.unwrap().to_string(), "2021-03-02 11:04:17");
    }

    #[test]
    fn contacts_need_a_role_and_keep_orcid() {
        let f = parse(RECORD.as_bytes()).unwrap();
        assert_eq!(f.contacts.len(), 1);
        let c = &f.contacts[0];
        assert_eq!(c.role, "author");
        assert_eq!(c.full_name.as_deref(), Some("Doe, Jo"));
        assert_eq!(
            c.name_identifier.as_deref(),
            Some("https://orcid.org/0000-0001-2345-6789")
        );
    }

    #[test]
    fn keyword_type_code_is_honoured() {
        let f = parse(RECORD.as_bytes()).unwrap();
        assert_eq!(f.keywords.len(), 1);
        assert_eq!(f.keywords[0].keyword_type, KeywordType::Place);
    }

    #[test]
    fn incomplete_bounding_box_is_absent() {
        let f = parse(RECORD.as_bytes()).unwrap();
        assert!(f.spatial_extent.is_none());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse(b"<gmd:MD_Metadata>").unwrap_err();
        assert_eq!(err.format(), SourceFormat::Xml);
    }
}
