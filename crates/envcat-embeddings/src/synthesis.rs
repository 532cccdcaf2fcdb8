//! Embedding text for a record: title, abstract, then lineage if enabled.

use envcat_core::constants::TEXT_FIELD_SEPARATOR;
use envcat_core::UnifiedRecord;

/// Build the text embedded for `record`.
///
/// Absent or blank fields are skipped. Parts are trimmed and joined with
/// `". "`, except after a part that already ends in terminal punctuation,
/// where a single space is used instead.
pub fn synthesize(record: &UnifiedRecord, include_lineage: bool) -> String {
    let mut parts: Vec<&str> = vec![record.title.as_str()];
    parts.extend(record.abstract_text.as_deref());
    if include_lineage {
        parts.extend(record.lineage.as_deref());
    }

    let mut text = String::new();
    for part in parts.into_iter().map(str::trim).filter(|p| !p.is_empty()) {
        if !text.is_empty() {
            if text.ends_with(['.', '!', '?']) {
                text.push(' ');
            } else {
                text.push_str(TEXT_FIELD_SEPARATOR);
            }
        }
        text.push_str(part);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, abstract_text: Option<&str>, lineage: Option<&str>) -> UnifiedRecord {
        let mut r = UnifiedRecord::new("r1", "s1", title);
        r.abstract_text = abstract_text.map(String::from);
        r.lineage = lineage.map(String::from);
        r
    }

    #[test]
    fn title_and_abstract() {
        let r = record("Soil Carbon", Some("Topsoil cores"), Some("Dry combustion"));
        assert_eq!(synthesize(&r, false), "Soil Carbon. Topsoil cores");
    }

    #[test]
    fn lineage_is_opt_in() {
        let r = record("Soil Carbon", Some("Topsoil cores"), Some("Dry combustion"));
        assert_eq!(
            synthesize(&r, true),
            "Soil Carbon. Topsoil cores. Dry combustion"
        );
    }

    #[test]
    fn blank_fields_are_skipped() {
        let r = record("  River Flow ", Some("   "), None);
        assert_eq!(synthesize(&r, true), "River Flow");
    }

    #[test]
    fn punctuation_is_not_doubled() {
        let r = record("Is peat storing carbon?", Some("Yes, mostly."), Some("Cores."));
        assert_eq!(
            synthesize(&r, true),
            "Is peat storing carbon? Yes, mostly. Cores."
        );
    }

    #[test]
    fn missing_title_is_skipped_too() {
        let r = record("", Some("Only an abstract"), None);
        assert_eq!(synthesize(&r, false), "Only an abstract");
    }
}
